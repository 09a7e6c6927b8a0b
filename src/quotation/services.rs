//! Quote service functions with database access.
//!
//! These functions validate, price and persist quotes, going through the
//! cache for reads.

use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::QuoteCache;
use crate::error::AppError;

use super::calculators::calculate_quote;
use super::input::QuoteInput;
use super::models::{QuoteRecord, QuoteWrite};
use super::queries;
use super::responses::QuoteComputed;
use super::settings::PricingSettings;
use super::validation::validate_quote_input;

/// Upper bound of the quote listing.
pub const QUOTE_LIST_LIMIT: i64 = 200;

/// Validate and price a quote without saving it.
///
/// The returned input carries the pricing settings that were applied, so
/// storing it and pricing it again gives the same result.
pub fn price_quote(
    input: QuoteInput,
    defaults: &PricingSettings,
) -> Result<(QuoteInput, QuoteComputed), AppError> {
    validate_quote_input(&input).map_err(AppError::Validation)?;

    let computed = calculate_quote(&input, defaults)?;
    let input = QuoteInput {
        pricing_settings: Some(computed.pricing_settings.clone().into()),
        ..input
    };

    Ok((input, computed))
}

/// Reserve the next quote number.
pub async fn reserve_quote_number(pool: &PgPool) -> Result<String, AppError> {
    let number = queries::next_quote_number(pool).await?;
    tracing::info!(quote_number = %number, "Reserved quote number");
    Ok(number)
}

/// Price and save a new quote.
///
/// A blank quote number is replaced with the next reserved number.
pub async fn create_quote(
    pool: &PgPool,
    cache: &QuoteCache,
    defaults: &PricingSettings,
    mut input: QuoteInput,
) -> Result<QuoteRecord, AppError> {
    let quote_number = input.meta.quote_number.trim().to_string();
    input.meta.quote_number = if quote_number.is_empty() {
        reserve_quote_number(pool).await?
    } else {
        quote_number
    };

    let (input, computed) = price_quote(input, defaults)?;
    let row = QuoteWrite::from_priced(&input, &computed)?;

    let record = queries::insert_quote(pool, &row)
        .await
        .map_err(|e| duplicate_number(e, &row.quote_number))?;

    tracing::info!(
        quote_id = %record.id,
        quote_number = %record.quote_number,
        final_price_usd = %record.final_price_usd,
        "Quote created"
    );

    let record = cache.store_quote(record).await;
    Ok((*record).clone())
}

/// Re-price and overwrite a saved quote.
pub async fn update_quote(
    pool: &PgPool,
    cache: &QuoteCache,
    defaults: &PricingSettings,
    id: Uuid,
    mut input: QuoteInput,
) -> Result<QuoteRecord, AppError> {
    let quote_number = input.meta.quote_number.trim().to_string();
    if quote_number.is_empty() {
        return Err(AppError::BadRequest("Quote number is required".to_string()));
    }
    input.meta.quote_number = quote_number;

    let (input, computed) = price_quote(input, defaults)?;
    let row = QuoteWrite::from_priced(&input, &computed)?;

    let record = queries::update_quote(pool, id, &row)
        .await
        .map_err(|e| duplicate_number(e, &row.quote_number))?
        .ok_or(AppError::NotFound)?;

    cache.invalidate_quote(&id).await;
    tracing::info!(
        quote_id = %record.id,
        quote_number = %record.quote_number,
        final_price_usd = %record.final_price_usd,
        "Quote updated"
    );

    let record = cache.store_quote(record).await;
    Ok((*record).clone())
}

/// Load a saved quote, cache first.
pub async fn get_quote(pool: &PgPool, cache: &QuoteCache, id: Uuid) -> Result<QuoteRecord, AppError> {
    if let Some(cached) = cache.get_quote(&id).await {
        tracing::debug!("Cache HIT for quote: {}", id);
        return Ok((*cached).clone());
    }

    tracing::debug!("Cache MISS for quote: {}", id);
    let record = queries::get_quote(pool, id).await?.ok_or(AppError::NotFound)?;
    let record = cache.store_quote(record).await;
    Ok((*record).clone())
}

/// Load a saved quote by its business number.
pub async fn get_quote_by_number(pool: &PgPool, quote_number: &str) -> Result<QuoteRecord, AppError> {
    queries::find_quote_by_number(pool, quote_number.trim())
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_quotes(pool: &PgPool) -> Result<Vec<QuoteRecord>, AppError> {
    queries::list_quotes(pool, QUOTE_LIST_LIMIT).await
}

fn duplicate_number(err: AppError, quote_number: &str) -> AppError {
    match err {
        AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            AppError::Conflict(format!("Quote number {} already exists", quote_number))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotation::defaults::build_default_quote_input;
    use crate::quotation::settings::PricingSettingsInput;
    use rust_decimal_macros::dec;

    fn filled_input() -> QuoteInput {
        let mut input = build_default_quote_input();
        input.meta.quote_date = "2025-03-01".to_string();
        input.meta.quote_number = "CNT-Q-000007".to_string();
        input.meta.client_type = "B2B".to_string();
        input.meta.patient_name = "Jane Doe".to_string();
        input.meta.country = "UK".to_string();
        input.currency_rates[0].usd_to_currency = dec!(50);
        input.medical.medical_cost_egp = dec!(10000);
        input
    }

    #[test]
    fn test_price_quote_pins_settings() {
        let mut input = filled_input();
        input.pricing_settings = None;
        let defaults = PricingSettings {
            b2b_medical_markup_multiplier: dec!(1.5),
            ..PricingSettings::default()
        };

        let (priced_input, computed) = price_quote(input, &defaults).unwrap();

        assert_eq!(priced_input.pricing_settings, Some(PricingSettingsInput::from(defaults.clone())));
        assert_eq!(computed.summary.medical_procedure_cost_usd, dec!(300));

        // Re-pricing the stored input ignores later changes to the defaults.
        let (_, again) = price_quote(priced_input, &PricingSettings::default()).unwrap();
        assert_eq!(again, computed);
    }

    #[test]
    fn test_price_quote_rejects_invalid_payload() {
        let mut input = filled_input();
        input.meta.patient_name.clear();

        match price_quote(input, &PricingSettings::default()) {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors[0].path, "meta.patientName");
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_price_quote_surfaces_missing_rate() {
        let mut input = filled_input();
        input.currency_rates.retain(|rate| rate.code != "EGP");

        assert!(matches!(
            price_quote(input, &PricingSettings::default()),
            Err(AppError::Pricing(_))
        ));
    }
}
