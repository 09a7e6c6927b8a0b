//! Quote request model.
//!
//! Mirrors the JSON document posted by the quotation form. Numeric fields are
//! coerced through [`decimal_or_zero`]; validation rules live on the derives
//! and are run by [`crate::quotation::validation`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::coerce::decimal_or_zero;
use super::settings::PricingSettingsInput;
use super::validation::non_negative;

/// Complete request to price a medical trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteInput {
    #[validate(nested)]
    pub meta: QuoteMeta,
    #[validate(nested)]
    pub medical: MedicalProcedureInput,
    #[validate(nested)]
    pub accommodation: AccommodationInput,
    #[validate(nested)]
    pub transportation: TransportationInput,
    #[validate(nested)]
    pub tourism_services: Vec<TourismServiceInput>,
    #[validate(nested)]
    pub indirect_costs: IndirectCostsInput,
    #[validate(nested)]
    pub currency_rates: Vec<CurrencyRateInput>,
    /// Absent fields (or the whole block) fall back to the configured defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_settings: Option<PricingSettingsInput>,
    #[validate(nested)]
    pub data_sheets: QuoteDataSheets,
}

/// Quote identification. Only `client_type` feeds the arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteMeta {
    #[validate(length(min = 1, message = "Quote date is required"))]
    pub quote_date: String,
    #[validate(length(min = 1, message = "Quote number is required"))]
    pub quote_number: String,
    #[validate(length(min = 1, message = "Client type is required"))]
    pub client_type: String,
    #[validate(length(min = 1, message = "Patient name is required"))]
    pub patient_name: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    pub age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalProcedureInput {
    pub procedure_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub cost_breakdown: Vec<MedicalCostBreakdownItem>,
    pub hospital_tier: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub medical_cost_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub length_of_stay_nights: Decimal,
}

/// Informational split of the medical cost, as supplied by a provider price list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalCostBreakdownItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub label: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub amount_egp: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AccommodationInput {
    pub hotel_category: String,
    pub room_type: String,
    pub meal_plan: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub cost_per_night_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub meal_plan_cost_per_day_egp: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportationInput {
    /// Already in USD; never converted.
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub flight_cost_usd: Decimal,
    pub flight_origin: String,
    pub flight_type: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub airport_transfers_egp: Decimal,
    pub airport_vehicle_type: String,
    /// Per-day rate, multiplied by `local_transport_days`.
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub local_transport_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub local_transport_days: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TourismServiceInput {
    pub service_name: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub quantity: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub unit_cost_egp: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct IndirectCostItemInput {
    pub category: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub annual_cost_usd: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct IndirectCostsInput {
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub expected_annual_patient_volume: Decimal,
    #[validate(nested)]
    pub items: Vec<IndirectCostItemInput>,
}

/// One row of the exchange rate table.
///
/// `usd_to_currency` is the number of local units per one US dollar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrencyRateInput {
    #[validate(length(min = 1, message = "Currency code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "Currency name is required"))]
    pub name: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub usd_to_currency: Decimal,
    pub notes: String,
}

/// Reference catalogs used to prefill the form. Never read by the calculators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteDataSheets {
    #[validate(nested)]
    pub medical_procedures: Vec<MedicalProcedureDataSheetRow>,
    #[validate(nested)]
    pub accommodations: Vec<AccommodationDataSheetRow>,
    #[validate(nested)]
    pub transportation: Vec<TransportationDataSheetRow>,
    #[validate(nested)]
    pub tourism_extras: Vec<TourismExtrasDataSheetRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalProcedureDataSheetRow {
    pub procedure_code: String,
    pub procedure_name: String,
    pub category: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub premium_hospital_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub mid_range_hospital_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub budget_hospital_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub typical_length_of_stay_nights: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub pre_op_days: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub post_op_days: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AccommodationDataSheetRow {
    pub hotel_code: String,
    pub hotel_name: String,
    pub star_rating: String,
    pub location: String,
    pub room_type: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub price_per_night_egp: Decimal,
    pub meal_plan: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub meal_plan_cost_egp_per_day: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub airport_distance_km: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportationDataSheetRow {
    pub service_type: String,
    pub description: String,
    pub route_details: String,
    pub vehicle_type: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub cost_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub cost_usd: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub cost_eur: Decimal,
    pub provider: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TourismExtrasDataSheetRow {
    pub service_code: String,
    pub service_name: String,
    pub category: String,
    pub description: String,
    pub duration: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub cost_egp: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub cost_usd: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub cost_eur: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    #[validate(custom(function = "non_negative"))]
    pub max_persons: Decimal,
    pub notes: String,
}
