//! Printable quotation page

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::quotation::{round_money, services, QuoteComputed, QuoteInput};
use crate::AppState;

/// Label/value line of the quotation
#[derive(Debug, Clone, PartialEq)]
pub struct PrintRow {
    pub label: String,
    pub value: String,
}

impl PrintRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Quotation print template
#[derive(Template)]
#[template(path = "quotes/print.html")]
pub struct QuotePrintTemplate {
    pub quote_number: String,
    pub quote_date: String,
    pub patient_name: String,
    pub country: String,
    pub age: String,
    pub client_type: String,
    pub procedure_name: String,
    pub hospital_tier: String,
    pub length_of_stay: String,
    pub inclusions: Vec<PrintRow>,
    pub additional_services: Vec<PrintRow>,
    pub has_additional_services: bool,
    pub summary: Vec<PrintRow>,
    pub total_price: String,
    pub other_currencies: Vec<PrintRow>,
    pub has_other_currencies: bool,
}

impl QuotePrintTemplate {
    pub fn build(input: &QuoteInput, computed: &QuoteComputed) -> Self {
        let summary = &computed.summary;

        let inclusions = vec![
            PrintRow::new(
                "Complete Medical Procedure",
                format_money(summary.medical_procedure_cost_usd, "USD"),
            ),
            PrintRow::new("Hospital Stay & Medical Care", "Included"),
            PrintRow::new(
                "Accommodation",
                format_money(summary.accommodation_cost_usd, "USD"),
            ),
            PrintRow::new("All Meals", or_default(&input.accommodation.meal_plan, "Included")),
            PrintRow::new(
                "International Flights",
                format_money(input.transportation.flight_cost_usd, "USD"),
            ),
            PrintRow::new(
                "Airport Transfers",
                or_default(&input.transportation.airport_vehicle_type, "Included"),
            ),
            PrintRow::new("Local Transportation", "As required"),
            PrintRow::new("24/7 Medical Coordinator", "Complete Journey Support"),
            PrintRow::new("Pre & Post-Op Consultations", "Included"),
            PrintRow::new("Medical Records & Documentation", "Included"),
        ];

        let additional_services: Vec<PrintRow> = computed
            .tourism_services
            .iter()
            .filter(|line| {
                !line.service.service_name.trim().is_empty() || line.service.quantity > Decimal::ZERO
            })
            .map(|line| {
                PrintRow::new(
                    format!(
                        "{} x {}",
                        or_default(&line.service.service_name, "Service"),
                        line.service.quantity.normalize()
                    ),
                    format_money(line.total_usd, "USD"),
                )
            })
            .collect();

        let summary_rows = vec![
            PrintRow::new("Package subtotal", format_money(summary.subtotal_usd, "USD")),
            PrintRow::new("Profit margin", format_money(summary.profit_amount_usd, "USD")),
        ];

        let other_currencies: Vec<PrintRow> = computed
            .final_price_by_currency
            .iter()
            .filter(|price| price.currency != "USD")
            .map(|price| PrintRow::new(price.currency.clone(), format_money(price.amount, &price.currency)))
            .collect();

        Self {
            quote_number: input.meta.quote_number.clone(),
            quote_date: or_default(&input.meta.quote_date, "-"),
            patient_name: input.meta.patient_name.clone(),
            country: input.meta.country.clone(),
            age: or_default(&input.meta.age, "-"),
            client_type: input.meta.client_type.clone(),
            procedure_name: input.medical.procedure_name.clone(),
            hospital_tier: input.medical.hospital_tier.clone(),
            length_of_stay: format!("{} nights", input.medical.length_of_stay_nights.normalize()),
            inclusions,
            has_additional_services: !additional_services.is_empty(),
            additional_services,
            summary: summary_rows,
            total_price: format_money(summary.final_price_usd, "USD"),
            has_other_currencies: !other_currencies.is_empty(),
            other_currencies,
        }
    }
}

/// Printable quotation for a saved quote
pub async fn print_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>> {
    let record = services::get_quote(&state.db, &state.cache, id).await?;
    let (input, computed) = record.decode()?;

    let template = QuotePrintTemplate::build(&input, &computed);
    Ok(Html(template.render()?))
}

/// `1234.5` -> `USD 1,234.50`
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = round_money(amount, 2);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}{} {}.{}",
        if negative { "-" } else { "" },
        currency,
        grouped,
        fraction
    )
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
