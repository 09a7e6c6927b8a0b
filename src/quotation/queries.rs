//! Database queries for saved quotes.
//!
//! All queries use sqlx `query_as` against the operations_quotes table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{QuoteRecord, QuoteWrite};

const QUOTE_COLUMNS: &str = r#"
    id, quote_number, quote_date, client_type, patient_name, country, age,
    input_data, computed_data,
    subtotal_usd, profit_margin, profit_amount_usd, final_price_usd,
    created_at, updated_at
"#;

/// List saved quotes, newest first
pub async fn list_quotes(pool: &PgPool, limit: i64) -> Result<Vec<QuoteRecord>, AppError> {
    let quotes = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM operations_quotes
        ORDER BY created_at DESC
        LIMIT $1
        "#
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(quotes)
}

/// Get a quote by id
pub async fn get_quote(pool: &PgPool, id: Uuid) -> Result<Option<QuoteRecord>, AppError> {
    let quote = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM operations_quotes
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(quote)
}

/// Get a quote by its business number
pub async fn find_quote_by_number(
    pool: &PgPool,
    quote_number: &str,
) -> Result<Option<QuoteRecord>, AppError> {
    let quote = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM operations_quotes
        WHERE quote_number = $1
        "#
    ))
    .bind(quote_number)
    .fetch_optional(pool)
    .await?;

    Ok(quote)
}

/// Insert a priced quote
pub async fn insert_quote(pool: &PgPool, quote: &QuoteWrite) -> Result<QuoteRecord, AppError> {
    let record = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        INSERT INTO operations_quotes (
            quote_number, quote_date, client_type, patient_name, country, age,
            input_data, computed_data,
            subtotal_usd, profit_margin, profit_amount_usd, final_price_usd
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(&quote.quote_number)
    .bind(&quote.quote_date)
    .bind(&quote.client_type)
    .bind(&quote.patient_name)
    .bind(&quote.country)
    .bind(quote.age)
    .bind(&quote.input_data)
    .bind(&quote.computed_data)
    .bind(quote.subtotal_usd)
    .bind(quote.profit_margin)
    .bind(quote.profit_amount_usd)
    .bind(quote.final_price_usd)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// Overwrite a saved quote. Returns `None` when the id does not exist.
pub async fn update_quote(
    pool: &PgPool,
    id: Uuid,
    quote: &QuoteWrite,
) -> Result<Option<QuoteRecord>, AppError> {
    let record = sqlx::query_as::<_, QuoteRecord>(&format!(
        r#"
        UPDATE operations_quotes
        SET quote_number = $2,
            quote_date = $3,
            client_type = $4,
            patient_name = $5,
            country = $6,
            age = $7,
            input_data = $8,
            computed_data = $9,
            subtotal_usd = $10,
            profit_margin = $11,
            profit_amount_usd = $12,
            final_price_usd = $13,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&quote.quote_number)
    .bind(&quote.quote_date)
    .bind(&quote.client_type)
    .bind(&quote.patient_name)
    .bind(&quote.country)
    .bind(quote.age)
    .bind(&quote.input_data)
    .bind(&quote.computed_data)
    .bind(quote.subtotal_usd)
    .bind(quote.profit_margin)
    .bind(quote.profit_amount_usd)
    .bind(quote.final_price_usd)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Reserve the next sequential quote number
pub async fn next_quote_number(pool: &PgPool) -> Result<String, AppError> {
    let (number,): (String,) = sqlx::query_as("SELECT next_operations_quote_number()")
        .fetch_one(pool)
        .await?;

    Ok(number)
}
