//! Database models for saved quotes.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::input::QuoteInput;
use super::responses::{QuoteComputed, QuoteListItemResponse, QuoteRecordResponse};

/// Quote from operations_quotes
#[derive(Debug, Clone, FromRow)]
pub struct QuoteRecord {
    pub id: Uuid,
    pub quote_number: String,
    pub quote_date: String,
    pub client_type: String,
    pub patient_name: String,
    pub country: String,
    pub age: Option<i32>,
    pub input_data: serde_json::Value,
    pub computed_data: serde_json::Value,
    pub subtotal_usd: Decimal,
    pub profit_margin: Decimal,
    pub profit_amount_usd: Decimal,
    pub final_price_usd: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteRecord {
    /// Decode the stored request and pricing snapshot.
    pub fn decode(&self) -> Result<(QuoteInput, QuoteComputed), serde_json::Error> {
        let input = serde_json::from_value(self.input_data.clone())?;
        let computed = serde_json::from_value(self.computed_data.clone())?;
        Ok((input, computed))
    }

    pub fn to_response(&self) -> QuoteRecordResponse {
        QuoteRecordResponse {
            id: self.id,
            quote_number: self.quote_number.clone(),
            quote_date: self.quote_date.clone(),
            client_type: self.client_type.clone(),
            patient_name: self.patient_name.clone(),
            country: self.country.clone(),
            age: self.age,
            input_data: self.input_data.clone(),
            computed_data: self.computed_data.clone(),
            subtotal_usd: self.subtotal_usd,
            profit_margin: self.profit_margin,
            profit_amount_usd: self.profit_amount_usd,
            final_price_usd: self.final_price_usd,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_list_item(&self) -> QuoteListItemResponse {
        QuoteListItemResponse {
            id: self.id,
            quote_number: self.quote_number.clone(),
            quote_date: self.quote_date.clone(),
            client_type: self.client_type.clone(),
            patient_name: self.patient_name.clone(),
            country: self.country.clone(),
            final_price_usd: self.final_price_usd,
            created_at: self.created_at,
        }
    }
}

/// Column values written on insert and update.
#[derive(Debug, Clone)]
pub struct QuoteWrite {
    pub quote_number: String,
    pub quote_date: String,
    pub client_type: String,
    pub patient_name: String,
    pub country: String,
    pub age: Option<i32>,
    pub input_data: serde_json::Value,
    pub computed_data: serde_json::Value,
    pub subtotal_usd: Decimal,
    pub profit_margin: Decimal,
    pub profit_amount_usd: Decimal,
    pub final_price_usd: Decimal,
}

impl QuoteWrite {
    /// Build the row for a priced quote.
    pub fn from_priced(
        input: &QuoteInput,
        computed: &QuoteComputed,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            quote_number: input.meta.quote_number.trim().to_string(),
            quote_date: input.meta.quote_date.clone(),
            client_type: input.meta.client_type.clone(),
            patient_name: input.meta.patient_name.clone(),
            country: input.meta.country.clone(),
            age: parse_age(&input.meta.age),
            input_data: serde_json::to_value(input)?,
            computed_data: serde_json::to_value(computed)?,
            subtotal_usd: computed.summary.subtotal_usd,
            profit_margin: computed.summary.profit_margin_rate,
            profit_amount_usd: computed.summary.profit_amount_usd,
            final_price_usd: computed.summary.final_price_usd,
        })
    }
}

/// Age is free text on the form; anything that is not a whole number is dropped.
pub fn parse_age(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i32>().ok().filter(|age| *age >= 0)
}
