//! Computed quote DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::input::{CurrencyRateInput, IndirectCostItemInput, QuoteInput, TourismServiceInput};
use super::settings::PricingSettings;

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

/// Exchange rate row with its reciprocal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedCurrencyRate {
    #[serde(flatten)]
    pub rate: CurrencyRateInput,
    /// USD per one unit of this currency; zero when the rate is unusable.
    pub rate_to_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationBreakdown {
    pub nights: Decimal,
    pub meal_plan_days: Decimal,
    pub total_egp: Decimal,
    pub total_usd: Decimal,
    pub meal_plan_total_egp: Decimal,
    pub meal_plan_total_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationBreakdown {
    pub flight_cost_usd: Decimal,
    pub airport_transfers_usd: Decimal,
    pub local_transport_total_egp: Decimal,
    pub local_transport_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedTourismService {
    #[serde(flatten)]
    pub service: TourismServiceInput,
    pub unit_cost_usd: Decimal,
    pub total_egp: Decimal,
    pub total_usd: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasTotals {
    pub total_egp: Decimal,
    pub total_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedIndirectCostItem {
    #[serde(flatten)]
    pub item: IndirectCostItemInput,
    pub monthly_cost_usd: Decimal,
    pub per_patient_usd: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndirectCostTotals {
    pub annual_usd: Decimal,
    pub monthly_usd: Decimal,
    pub per_patient_usd: Decimal,
}

/// Overhead allocation. Reported next to the price, never folded into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedIndirectCosts {
    pub expected_annual_patient_volume: Decimal,
    pub items: Vec<ComputedIndirectCostItem>,
    pub totals: IndirectCostTotals,
}

/// Headline figures of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    /// Medical cost after the client-type markup.
    #[serde(with = "rust_decimal::serde::str")]
    pub medical_procedure_cost_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub medical_procedure_cost_egp: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub accommodation_cost_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub accommodation_cost_egp: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub transportation_cost_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub transportation_cost_egp: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tourism_cost_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tourism_cost_egp: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub non_medical_cost_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub indirect_cost_per_patient_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub medical_markup_multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_margin_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_amount_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price_usd: Decimal,
}

/// Full output of the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteComputed {
    /// Rule actually applied ("B2B" or "B2C").
    pub pricing_rule: String,
    pub pricing_settings: PricingSettings,
    pub currency_rates: Vec<ComputedCurrencyRate>,
    /// Medical cost before markup.
    pub medical_cost_usd: Decimal,
    pub accommodation: AccommodationBreakdown,
    pub transportation: TransportationBreakdown,
    pub tourism_services: Vec<ComputedTourismService>,
    pub extras_totals: ExtrasTotals,
    pub indirect_costs: ComputedIndirectCosts,
    pub summary: QuoteSummary,
    /// Final price converted into every currency with a usable rate.
    pub final_price_by_currency: Vec<MoneyResponse>,
}

/// Response for `POST /quotes/calculate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateQuoteResponse {
    pub input: QuoteInput,
    pub computed: QuoteComputed,
}

/// Response for quote number reservation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuoteNumberResponse {
    pub quote_number: String,
}

/// Saved quote as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRecordResponse {
    pub id: Uuid,
    pub quote_number: String,
    pub quote_date: String,
    pub client_type: String,
    pub patient_name: String,
    pub country: String,
    pub age: Option<i32>,
    pub input_data: serde_json::Value,
    pub computed_data: serde_json::Value,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_margin: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_amount_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price_usd: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the quote listing (no JSON payloads).
#[derive(Debug, Clone, Serialize)]
pub struct QuoteListItemResponse {
    pub id: Uuid,
    pub quote_number: String,
    pub quote_date: String,
    pub client_type: String,
    pub patient_name: String,
    pub country: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price_usd: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
