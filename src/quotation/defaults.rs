//! Blank quote used to seed the quotation form.

use super::input::{
    AccommodationDataSheetRow, CurrencyRateInput, IndirectCostItemInput, IndirectCostsInput,
    MedicalProcedureDataSheetRow, QuoteDataSheets, QuoteInput, TourismExtrasDataSheetRow,
    TourismServiceInput, TransportationDataSheetRow,
};
use super::settings::PricingSettings;

const BLANK_TOURISM_ROWS: usize = 5;
const BLANK_INDIRECT_COST_ROWS: usize = 10;
const BLANK_DATA_SHEET_ROWS: usize = 5;

/// Currencies offered in the rate table, rates left for the operator to fill.
const DEFAULT_CURRENCIES: [(&str, &str); 5] = [
    ("EGP", "EGP (Egyptian Pound)"),
    ("EUR", "EUR (Euro)"),
    ("GBP", "GBP (British Pound)"),
    ("SAR", "SAR (Saudi Riyal)"),
    ("AED", "AED (UAE Dirham)"),
];

/// Build a fresh, fully populated quote with every amount at zero.
///
/// Each call allocates a new value; nothing is shared between callers. The
/// EGP rate starts at zero and has to be set before the quote can be priced.
pub fn build_default_quote_input() -> QuoteInput {
    QuoteInput {
        tourism_services: vec![TourismServiceInput::default(); BLANK_TOURISM_ROWS],
        indirect_costs: IndirectCostsInput {
            items: vec![IndirectCostItemInput::default(); BLANK_INDIRECT_COST_ROWS],
            ..IndirectCostsInput::default()
        },
        currency_rates: default_currency_rates(),
        pricing_settings: Some(PricingSettings::default().into()),
        data_sheets: QuoteDataSheets {
            medical_procedures: vec![MedicalProcedureDataSheetRow::default(); BLANK_DATA_SHEET_ROWS],
            accommodations: vec![AccommodationDataSheetRow::default(); BLANK_DATA_SHEET_ROWS],
            transportation: vec![TransportationDataSheetRow::default(); BLANK_DATA_SHEET_ROWS],
            tourism_extras: vec![TourismExtrasDataSheetRow::default(); BLANK_DATA_SHEET_ROWS],
        },
        ..QuoteInput::default()
    }
}

fn default_currency_rates() -> Vec<CurrencyRateInput> {
    DEFAULT_CURRENCIES
        .iter()
        .map(|(code, name)| CurrencyRateInput {
            code: code.to_string(),
            name: name.to_string(),
            ..CurrencyRateInput::default()
        })
        .collect()
}
