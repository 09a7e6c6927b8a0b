//! Core quotation pricing functions.
//!
//! Pure functions for pricing math - no database access. A quote is priced in
//! three stages that must run in this order:
//!
//! 1. cost aggregation: EGP line items are summed and converted to USD with
//!    the single EGP rate of the request;
//! 2. markup/margin: the client-type multiplier is applied to the medical
//!    cost, the margin rate to the raw non-medical cost;
//! 3. indirect allocation: annual overhead spread over the expected patient
//!    volume, reported beside the price.
//!
//! All arithmetic is checked; a figure that leaves the `Decimal` range fails
//! with [`PricingError::AmountOutOfRange`].

use rust_decimal::prelude::*;
use thiserror::Error;

use super::input::{CurrencyRateInput, IndirectCostItemInput, QuoteInput, TourismServiceInput};
use super::responses::{
    AccommodationBreakdown, ComputedCurrencyRate, ComputedIndirectCostItem, ComputedIndirectCosts,
    ComputedTourismService, ExtrasTotals, IndirectCostTotals, MoneyResponse, QuoteComputed,
    QuoteSummary, TransportationBreakdown,
};
use super::settings::{
    medical_markup_multiplier, non_medical_margin_rate, ClientType, PricingSettings,
};

/// Currency in which most quote inputs are denominated.
pub const LOCAL_CURRENCY: &str = "EGP";

/// Currency of every computed price.
pub const BASE_CURRENCY: &str = "USD";

const MONTHS_PER_YEAR: i64 = 12;

/// Pricing failures. The exchange rate variants block quoting until the rate
/// table is repaired; `AmountOutOfRange` means the figures themselves are
/// implausibly large.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("No exchange rate configured for {code}")]
    MissingExchangeRate { code: String },

    #[error("Exchange rate for {code} must be greater than zero (got {rate})")]
    InvalidExchangeRate { code: String, rate: Decimal },

    #[error("Amount out of range while computing {field}")]
    AmountOutOfRange { field: &'static str },
}

type PricingResult<T> = Result<T, PricingError>;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Only used when presenting figures; the engine keeps full precision.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use carentour_quotes::quotation::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));
/// assert_eq!(round_money(dec!(122.505), 2), dec!(122.5));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Local units per one US dollar for the `EGP` entry of the rate table.
///
/// The code must match exactly.
pub fn resolve_usd_to_egp(rates: &[CurrencyRateInput]) -> PricingResult<Decimal> {
    let rate = rates
        .iter()
        .find(|rate| rate.code == LOCAL_CURRENCY)
        .ok_or_else(|| PricingError::MissingExchangeRate {
            code: LOCAL_CURRENCY.to_string(),
        })?;

    if rate.usd_to_currency <= Decimal::ZERO {
        return Err(PricingError::InvalidExchangeRate {
            code: LOCAL_CURRENCY.to_string(),
            rate: rate.usd_to_currency,
        });
    }

    Ok(rate.usd_to_currency)
}

/// Attach the USD-per-unit reciprocal to every rate row.
pub fn compute_currency_rates(
    rates: &[CurrencyRateInput],
) -> PricingResult<Vec<ComputedCurrencyRate>> {
    rates
        .iter()
        .map(|rate| -> PricingResult<ComputedCurrencyRate> {
            let usd_to_currency = non_negative(rate.usd_to_currency);
            let rate_to_usd = if usd_to_currency > Decimal::ZERO {
                div(Decimal::ONE, usd_to_currency, "currencyRates")?
            } else {
                Decimal::ZERO
            };
            Ok(ComputedCurrencyRate {
                rate: CurrencyRateInput {
                    usd_to_currency,
                    ..rate.clone()
                },
                rate_to_usd,
            })
        })
        .collect()
}

/// USD costs split into the medical and non-medical buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAggregation {
    pub medical_cost_egp: Decimal,
    pub medical_cost_usd: Decimal,
    pub accommodation: AccommodationBreakdown,
    pub accommodation_cost_egp: Decimal,
    pub accommodation_cost_usd: Decimal,
    pub transportation: TransportationBreakdown,
    pub transportation_cost_egp: Decimal,
    pub transportation_cost_usd: Decimal,
    pub tourism_services: Vec<ComputedTourismService>,
    pub extras_totals: ExtrasTotals,
    pub non_medical_cost_usd: Decimal,
}

/// Convert every EGP cost of the request with `usd_to_egp` and bucket it.
///
/// Negative inputs count as zero. `usd_to_egp` must be positive.
pub fn aggregate_costs(input: &QuoteInput, usd_to_egp: Decimal) -> PricingResult<CostAggregation> {
    let to_usd = |egp: Decimal, field: &'static str| div(egp, usd_to_egp, field);

    let medical_cost_egp = non_negative(input.medical.medical_cost_egp);
    let medical_cost_usd = to_usd(medical_cost_egp, "medical")?;

    // Meal plan is per day, one day per night of stay.
    let nights = non_negative(input.medical.length_of_stay_nights);
    let accommodation = &input.accommodation;
    let room_total_egp = mul(
        non_negative(accommodation.cost_per_night_egp),
        nights,
        "accommodation",
    )?;
    let meal_plan_total_egp = mul(
        non_negative(accommodation.meal_plan_cost_per_day_egp),
        nights,
        "accommodation",
    )?;
    let accommodation_cost_egp = add(room_total_egp, meal_plan_total_egp, "accommodation")?;
    let accommodation_cost_usd = to_usd(accommodation_cost_egp, "accommodation")?;

    let transport = &input.transportation;
    let flight_cost_usd = non_negative(transport.flight_cost_usd);
    let airport_transfers_egp = non_negative(transport.airport_transfers_egp);
    let local_transport_total_egp = mul(
        non_negative(transport.local_transport_egp),
        non_negative(transport.local_transport_days),
        "transportation",
    )?;
    let airport_transfers_usd = to_usd(airport_transfers_egp, "transportation")?;
    let local_transport_usd = to_usd(local_transport_total_egp, "transportation")?;
    let transportation_cost_usd = sum(
        [flight_cost_usd, airport_transfers_usd, local_transport_usd],
        "transportation",
    )?;
    let transportation_cost_egp = add(
        airport_transfers_egp,
        local_transport_total_egp,
        "transportation",
    )?;

    let tourism_services = input
        .tourism_services
        .iter()
        .map(|service| -> PricingResult<ComputedTourismService> {
            let quantity = non_negative(service.quantity);
            let unit_cost_egp = non_negative(service.unit_cost_egp);
            let total_egp = mul(quantity, unit_cost_egp, "tourismServices")?;
            Ok(ComputedTourismService {
                service: TourismServiceInput {
                    service_name: service.service_name.clone(),
                    quantity,
                    unit_cost_egp,
                },
                unit_cost_usd: to_usd(unit_cost_egp, "tourismServices")?,
                total_egp,
                total_usd: to_usd(total_egp, "tourismServices")?,
            })
        })
        .collect::<PricingResult<Vec<_>>>()?;

    // Sum in EGP first, then convert once.
    let tourism_total_egp = sum(tourism_services.iter().map(|s| s.total_egp), "tourismServices")?;
    let extras_totals = ExtrasTotals {
        total_egp: tourism_total_egp,
        total_usd: to_usd(tourism_total_egp, "tourismServices")?,
    };

    let non_medical_cost_usd = sum(
        [
            accommodation_cost_usd,
            transportation_cost_usd,
            extras_totals.total_usd,
        ],
        "nonMedicalCost",
    )?;

    Ok(CostAggregation {
        medical_cost_egp,
        medical_cost_usd,
        accommodation: AccommodationBreakdown {
            nights,
            meal_plan_days: nights,
            total_egp: room_total_egp,
            total_usd: to_usd(room_total_egp, "accommodation")?,
            meal_plan_total_egp,
            meal_plan_total_usd: to_usd(meal_plan_total_egp, "accommodation")?,
        },
        accommodation_cost_egp,
        accommodation_cost_usd,
        transportation: TransportationBreakdown {
            flight_cost_usd,
            airport_transfers_usd,
            local_transport_total_egp,
            local_transport_usd,
        },
        transportation_cost_egp,
        transportation_cost_usd,
        tourism_services,
        extras_totals,
        non_medical_cost_usd,
    })
}

/// Client-facing price derived from raw costs.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupResult {
    pub medical_markup_multiplier: Decimal,
    pub medical_procedure_cost_usd: Decimal,
    pub non_medical_margin_rate: Decimal,
    pub subtotal_usd: Decimal,
    pub profit_amount_usd: Decimal,
    pub final_price_usd: Decimal,
}

/// Apply the client-type markup and margin.
///
/// The multiplier touches only the medical cost; the margin is taken on the
/// raw non-medical cost, never on the subtotal.
pub fn apply_markup(
    medical_cost_usd: Decimal,
    non_medical_cost_usd: Decimal,
    client: &ClientType,
    settings: &PricingSettings,
) -> PricingResult<MarkupResult> {
    let multiplier = medical_markup_multiplier(client, settings);
    let medical_procedure_cost_usd = mul(medical_cost_usd, multiplier, "medicalProcedureCost")?;

    let margin_rate = non_medical_margin_rate(client, settings);
    let subtotal_usd = add(medical_procedure_cost_usd, non_medical_cost_usd, "subtotal")?;
    let profit_amount_usd = mul(non_medical_cost_usd, margin_rate, "profitAmount")?;
    let final_price_usd = add(subtotal_usd, profit_amount_usd, "finalPrice")?;

    Ok(MarkupResult {
        medical_markup_multiplier: multiplier,
        medical_procedure_cost_usd,
        non_medical_margin_rate: margin_rate,
        subtotal_usd,
        profit_amount_usd,
        final_price_usd,
    })
}

/// Spread annual overhead across the expected patient volume.
///
/// A volume of zero yields a zero per-patient figure instead of an error.
pub fn allocate_indirect_costs(
    expected_annual_patient_volume: Decimal,
    items: &[IndirectCostItemInput],
) -> PricingResult<ComputedIndirectCosts> {
    let volume = non_negative(expected_annual_patient_volume);
    let per_patient = |annual: Decimal| {
        if volume > Decimal::ZERO {
            div(annual, volume, "indirectCosts")
        } else {
            Ok(Decimal::ZERO)
        }
    };

    let items = items
        .iter()
        .map(|item| -> PricingResult<ComputedIndirectCostItem> {
            let annual_cost_usd = non_negative(item.annual_cost_usd);
            Ok(ComputedIndirectCostItem {
                item: IndirectCostItemInput {
                    annual_cost_usd,
                    ..item.clone()
                },
                monthly_cost_usd: div(
                    annual_cost_usd,
                    Decimal::from(MONTHS_PER_YEAR),
                    "indirectCosts",
                )?,
                per_patient_usd: per_patient(annual_cost_usd)?,
            })
        })
        .collect::<PricingResult<Vec<_>>>()?;

    let annual_usd = sum(items.iter().map(|i| i.item.annual_cost_usd), "indirectCosts")?;
    let monthly_usd = sum(items.iter().map(|i| i.monthly_cost_usd), "indirectCosts")?;

    Ok(ComputedIndirectCosts {
        expected_annual_patient_volume: volume,
        items,
        totals: IndirectCostTotals {
            annual_usd,
            monthly_usd,
            per_patient_usd: per_patient(annual_usd)?,
        },
    })
}

/// Price a quote request.
///
/// `defaults` fills any pricing setting the request leaves out and repairs
/// invalid ones. Fails when the EGP exchange rate is missing or not positive,
/// or when a figure leaves the `Decimal` range.
pub fn calculate_quote(input: &QuoteInput, defaults: &PricingSettings) -> PricingResult<QuoteComputed> {
    let settings = input
        .pricing_settings
        .clone()
        .unwrap_or_default()
        .resolve(defaults);

    let usd_to_egp = resolve_usd_to_egp(&input.currency_rates)?;
    let currency_rates = compute_currency_rates(&input.currency_rates)?;

    let client = ClientType::parse(&input.meta.client_type);
    if let ClientType::Other(raw) = &client {
        tracing::warn!(
            quote_number = %input.meta.quote_number,
            client_type = %raw,
            "Unrecognized client type, pricing with B2C rules"
        );
    }

    let costs = aggregate_costs(input, usd_to_egp)?;
    let markup = apply_markup(
        costs.medical_cost_usd,
        costs.non_medical_cost_usd,
        &client,
        &settings,
    )?;
    let indirect_costs = allocate_indirect_costs(
        input.indirect_costs.expected_annual_patient_volume,
        &input.indirect_costs.items,
    )?;
    let final_price_by_currency = convert_final_price(markup.final_price_usd, &currency_rates)?;

    tracing::debug!(
        quote_number = %input.meta.quote_number,
        pricing_rule = client.pricing_rule(),
        final_price_usd = %markup.final_price_usd,
        "Quote priced"
    );

    Ok(QuoteComputed {
        pricing_rule: client.pricing_rule().to_string(),
        pricing_settings: settings,
        currency_rates,
        medical_cost_usd: costs.medical_cost_usd,
        summary: QuoteSummary {
            medical_procedure_cost_usd: markup.medical_procedure_cost_usd,
            medical_procedure_cost_egp: costs.medical_cost_egp,
            accommodation_cost_usd: costs.accommodation_cost_usd,
            accommodation_cost_egp: costs.accommodation_cost_egp,
            transportation_cost_usd: costs.transportation_cost_usd,
            transportation_cost_egp: costs.transportation_cost_egp,
            tourism_cost_usd: costs.extras_totals.total_usd,
            tourism_cost_egp: costs.extras_totals.total_egp,
            non_medical_cost_usd: costs.non_medical_cost_usd,
            indirect_cost_per_patient_usd: indirect_costs.totals.per_patient_usd,
            medical_markup_multiplier: markup.medical_markup_multiplier,
            subtotal_usd: markup.subtotal_usd,
            profit_margin_rate: markup.non_medical_margin_rate,
            profit_amount_usd: markup.profit_amount_usd,
            final_price_usd: markup.final_price_usd,
        },
        accommodation: costs.accommodation,
        transportation: costs.transportation,
        tourism_services: costs.tourism_services,
        extras_totals: costs.extras_totals,
        indirect_costs,
        final_price_by_currency,
    })
}

/// USD final price followed by its value in every currency with a usable rate.
fn convert_final_price(
    final_price_usd: Decimal,
    rates: &[ComputedCurrencyRate],
) -> PricingResult<Vec<MoneyResponse>> {
    let mut prices = vec![MoneyResponse {
        amount: final_price_usd,
        currency: BASE_CURRENCY.to_string(),
    }];

    for rate in rates
        .iter()
        .filter(|r| r.rate.usd_to_currency > Decimal::ZERO)
        .filter(|r| !r.rate.code.trim().eq_ignore_ascii_case(BASE_CURRENCY))
    {
        prices.push(MoneyResponse {
            amount: mul(final_price_usd, rate.rate.usd_to_currency, "finalPriceByCurrency")?,
            currency: rate.rate.code.trim().to_ascii_uppercase(),
        });
    }

    Ok(prices)
}

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

fn add(a: Decimal, b: Decimal, field: &'static str) -> PricingResult<Decimal> {
    a.checked_add(b)
        .ok_or(PricingError::AmountOutOfRange { field })
}

fn mul(a: Decimal, b: Decimal, field: &'static str) -> PricingResult<Decimal> {
    a.checked_mul(b)
        .ok_or(PricingError::AmountOutOfRange { field })
}

fn div(a: Decimal, b: Decimal, field: &'static str) -> PricingResult<Decimal> {
    a.checked_div(b)
        .ok_or(PricingError::AmountOutOfRange { field })
}

fn sum(
    values: impl IntoIterator<Item = Decimal>,
    field: &'static str,
) -> PricingResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(total, value, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotation::defaults::build_default_quote_input;
    use rust_decimal_macros::dec;

    fn egp_rate(usd_to_currency: Decimal) -> CurrencyRateInput {
        CurrencyRateInput {
            code: "EGP".to_string(),
            name: "EGP".to_string(),
            usd_to_currency,
            notes: String::new(),
        }
    }

    /// Fixture used by the operations team when the calculator was introduced.
    fn worked_example() -> QuoteInput {
        let mut input = build_default_quote_input();
        input.meta.client_type = "B2B".to_string();
        input.pricing_settings = Some(PricingSettings::default().into());
        input.currency_rates = vec![egp_rate(dec!(50))];
        input.medical.medical_cost_egp = dec!(10000);
        input.medical.length_of_stay_nights = dec!(2);
        input.accommodation.cost_per_night_egp = dec!(500);
        input.accommodation.meal_plan_cost_per_day_egp = dec!(100);
        input.transportation.flight_cost_usd = dec!(300);
        input.transportation.airport_transfers_egp = dec!(500);
        input.transportation.local_transport_egp = dec!(300);
        input.transportation.local_transport_days = dec!(1);
        input.tourism_services = vec![TourismServiceInput {
            service_name: "Tour".to_string(),
            quantity: dec!(1),
            unit_cost_egp: dec!(500),
        }];
        input.indirect_costs.expected_annual_patient_volume = dec!(100);
        input.indirect_costs.items = vec![IndirectCostItemInput {
            category: "Overhead".to_string(),
            annual_cost_usd: dec!(1200),
            notes: String::new(),
        }];
        input
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.345), 2), dec!(2.34));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    // ==================== exchange rate tests ====================

    #[test]
    fn test_resolve_usd_to_egp() {
        let rates = vec![egp_rate(dec!(50))];
        assert_eq!(resolve_usd_to_egp(&rates), Ok(dec!(50)));
    }

    #[test]
    fn test_resolve_usd_to_egp_missing() {
        let rates = vec![CurrencyRateInput {
            code: "EUR".to_string(),
            name: "Euro".to_string(),
            usd_to_currency: dec!(0.92),
            notes: String::new(),
        }];
        assert_eq!(
            resolve_usd_to_egp(&rates),
            Err(PricingError::MissingExchangeRate {
                code: "EGP".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_usd_to_egp_exact_code() {
        for code in ["egp", " EGP"] {
            let rates = vec![CurrencyRateInput {
                code: code.to_string(),
                ..egp_rate(dec!(50))
            }];
            assert!(matches!(
                resolve_usd_to_egp(&rates),
                Err(PricingError::MissingExchangeRate { .. })
            ));
        }
    }

    #[test]
    fn test_resolve_usd_to_egp_not_positive() {
        for rate in [Decimal::ZERO, dec!(-3)] {
            let err = resolve_usd_to_egp(&[egp_rate(rate)]).unwrap_err();
            assert!(matches!(err, PricingError::InvalidExchangeRate { .. }));
        }
    }

    #[test]
    fn test_compute_currency_rates_reciprocal() {
        let rates =
            compute_currency_rates(&[egp_rate(dec!(50)), egp_rate(Decimal::ZERO)]).unwrap();
        assert_eq!(rates[0].rate_to_usd, dec!(0.02));
        assert_eq!(rates[1].rate_to_usd, Decimal::ZERO);
    }

    // ==================== calculate_quote tests ====================

    #[test]
    fn test_worked_example_b2b() {
        let computed = calculate_quote(&worked_example(), &PricingSettings::default()).unwrap();
        let summary = &computed.summary;

        assert_eq!(computed.medical_cost_usd, dec!(200));
        assert_eq!(summary.medical_procedure_cost_usd, dec!(324));
        // accommodation 24 + transport (300 + 10 + 6) + tourism 10
        assert_eq!(summary.accommodation_cost_usd, dec!(24));
        assert_eq!(summary.transportation_cost_usd, dec!(316));
        assert_eq!(summary.tourism_cost_usd, dec!(10));
        assert_eq!(summary.non_medical_cost_usd, dec!(350));
        assert_eq!(summary.subtotal_usd, dec!(674));
        assert_eq!(summary.profit_margin_rate, dec!(0.35));
        assert_eq!(summary.profit_amount_usd, dec!(122.5));
        assert_eq!(summary.final_price_usd, dec!(796.5));
        assert_eq!(summary.indirect_cost_per_patient_usd, dec!(12));
        assert_eq!(computed.pricing_rule, "B2B");
    }

    #[test]
    fn test_unit_multiplier_keeps_medical_cost() {
        let mut input = worked_example();
        input.pricing_settings = Some(
            PricingSettings {
                b2b_medical_markup_multiplier: Decimal::ONE,
                ..PricingSettings::default()
            }
            .into(),
        );

        let summary = calculate_quote(&input, &PricingSettings::default())
            .unwrap()
            .summary;

        let expected_medical = dec!(200);
        let expected_non_medical = dec!(350);
        let expected_profit = expected_non_medical * dec!(0.35);
        assert_eq!(summary.medical_procedure_cost_usd, expected_medical);
        assert_eq!(summary.subtotal_usd, expected_medical + expected_non_medical);
        assert_eq!(summary.profit_amount_usd, expected_profit);
        assert_eq!(
            summary.final_price_usd,
            expected_medical + expected_non_medical + expected_profit
        );
    }

    #[test]
    fn test_indirect_cost_not_in_final_price() {
        let mut with_overhead = worked_example();
        with_overhead.indirect_costs.items[0].annual_cost_usd = dec!(999999);
        let a = calculate_quote(&worked_example(), &PricingSettings::default()).unwrap();
        let b = calculate_quote(&with_overhead, &PricingSettings::default()).unwrap();

        assert_eq!(a.summary.final_price_usd, b.summary.final_price_usd);
        assert_ne!(
            a.summary.indirect_cost_per_patient_usd,
            b.summary.indirect_cost_per_patient_usd
        );
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let input = worked_example();
        let first = calculate_quote(&input, &PricingSettings::default()).unwrap();
        let second = calculate_quote(&input.clone(), &PricingSettings::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_client_type_switch() {
        let b2b_input = worked_example();
        let mut other_input = worked_example();
        other_input.meta.client_type = "Direct patient".to_string();

        let b2b = calculate_quote(&b2b_input, &PricingSettings::default()).unwrap();
        let other = calculate_quote(&other_input, &PricingSettings::default()).unwrap();

        assert_eq!(other.pricing_rule, "B2C");
        assert_eq!(b2b.summary.non_medical_cost_usd, other.summary.non_medical_cost_usd);
        assert_eq!(
            b2b.summary.medical_procedure_cost_usd / other.summary.medical_procedure_cost_usd,
            dec!(1.62) / dec!(1.8)
        );
        assert_eq!(
            b2b.summary.profit_amount_usd / other.summary.profit_amount_usd,
            dec!(0.35) / dec!(0.5)
        );
    }

    #[test]
    fn test_missing_egp_rate_is_an_error() {
        let mut input = worked_example();
        input.currency_rates.clear();
        assert_eq!(
            calculate_quote(&input, &PricingSettings::default()),
            Err(PricingError::MissingExchangeRate {
                code: "EGP".to_string()
            })
        );

        input.currency_rates = vec![egp_rate(Decimal::ZERO)];
        assert!(matches!(
            calculate_quote(&input, &PricingSettings::default()),
            Err(PricingError::InvalidExchangeRate { .. })
        ));
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let mut input = worked_example();
        input.pricing_settings = None;
        let defaults = PricingSettings {
            b2b_medical_markup_multiplier: dec!(2),
            ..PricingSettings::default()
        };

        let computed = calculate_quote(&input, &defaults).unwrap();
        assert_eq!(computed.summary.medical_procedure_cost_usd, dec!(400));
        assert_eq!(computed.pricing_settings, defaults);
    }

    #[test]
    fn test_partial_settings_use_configured_defaults() {
        let mut input = worked_example();
        input.pricing_settings = Some(
            serde_json::from_str(
                r#"{"b2bNonMedicalMarginRate": null, "b2cMedicalMarkupMultiplier": 2}"#,
            )
            .unwrap(),
        );
        let defaults = PricingSettings {
            b2b_non_medical_margin_rate: dec!(0.4),
            b2c_non_medical_margin_rate: dec!(0.45),
            ..PricingSettings::default()
        };

        let computed = calculate_quote(&input, &defaults).unwrap();

        assert_eq!(computed.pricing_settings.b2b_non_medical_margin_rate, dec!(0.4));
        assert_eq!(computed.pricing_settings.b2c_non_medical_margin_rate, dec!(0.45));
        assert_eq!(computed.pricing_settings.b2c_medical_markup_multiplier, dec!(2));
        // 0.4 of the 350 non-medical cost
        assert_eq!(computed.summary.profit_amount_usd, dec!(140));
    }

    #[test]
    fn test_oversized_amounts_are_an_error() {
        let mut input = worked_example();
        input.tourism_services[0].quantity = dec!(1000000000000000);
        input.tourism_services[0].unit_cost_egp = dec!(1000000000000000);

        assert_eq!(
            calculate_quote(&input, &PricingSettings::default()),
            Err(PricingError::AmountOutOfRange {
                field: "tourismServices"
            })
        );
    }

    #[test]
    fn test_tiny_exchange_rate_is_an_error() {
        let mut input = worked_example();
        input.currency_rates = vec![egp_rate(Decimal::new(1, 27))];

        assert!(matches!(
            calculate_quote(&input, &PricingSettings::default()),
            Err(PricingError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_negative_inputs_count_as_zero() {
        let mut input = worked_example();
        input.transportation.flight_cost_usd = dec!(-300);
        input.tourism_services[0].quantity = dec!(-1);

        let computed = calculate_quote(&input, &PricingSettings::default()).unwrap();
        assert_eq!(computed.transportation.flight_cost_usd, Decimal::ZERO);
        assert_eq!(computed.summary.tourism_cost_usd, Decimal::ZERO);
        assert_eq!(computed.summary.non_medical_cost_usd, dec!(40));
    }

    #[test]
    fn test_local_transport_multiplied_by_days() {
        let mut input = worked_example();
        input.transportation.local_transport_days = dec!(4);

        let computed = calculate_quote(&input, &PricingSettings::default()).unwrap();
        assert_eq!(computed.transportation.local_transport_total_egp, dec!(1200));
        assert_eq!(computed.transportation.local_transport_usd, dec!(24));
    }

    #[test]
    fn test_tourism_lines() {
        let mut input = worked_example();
        input.tourism_services.push(TourismServiceInput {
            service_name: "Nile cruise".to_string(),
            quantity: dec!(2),
            unit_cost_egp: dec!(1250),
        });

        let computed = calculate_quote(&input, &PricingSettings::default()).unwrap();
        let cruise = &computed.tourism_services[1];
        assert_eq!(cruise.unit_cost_usd, dec!(25));
        assert_eq!(cruise.total_egp, dec!(2500));
        assert_eq!(cruise.total_usd, dec!(50));
        assert_eq!(computed.extras_totals.total_egp, dec!(3000));
        assert_eq!(computed.extras_totals.total_usd, dec!(60));
    }

    #[test]
    fn test_final_price_by_currency() {
        let mut input = worked_example();
        input.currency_rates.push(CurrencyRateInput {
            code: "eur".to_string(),
            name: "Euro".to_string(),
            usd_to_currency: dec!(0.9),
            notes: String::new(),
        });
        input.currency_rates.push(CurrencyRateInput {
            code: "GBP".to_string(),
            name: "Pound".to_string(),
            usd_to_currency: Decimal::ZERO,
            notes: String::new(),
        });

        let computed = calculate_quote(&input, &PricingSettings::default()).unwrap();
        let prices = &computed.final_price_by_currency;

        assert_eq!(prices.len(), 3);
        assert_eq!(prices[0].currency, "USD");
        assert_eq!(prices[0].amount, dec!(796.5));
        assert_eq!(prices[1].currency, "EGP");
        assert_eq!(prices[1].amount, dec!(39825));
        assert_eq!(prices[2].currency, "EUR");
        assert_eq!(prices[2].amount, dec!(716.85));
    }

    // ==================== allocate_indirect_costs tests ====================

    #[test]
    fn test_allocate_indirect_costs() {
        let items = vec![
            IndirectCostItemInput {
                category: "Rent".to_string(),
                annual_cost_usd: dec!(24000),
                notes: String::new(),
            },
            IndirectCostItemInput {
                category: "Staff".to_string(),
                annual_cost_usd: dec!(36000),
                notes: String::new(),
            },
        ];

        let result = allocate_indirect_costs(dec!(200), &items).unwrap();

        assert_eq!(result.items[0].monthly_cost_usd, dec!(2000));
        assert_eq!(result.items[0].per_patient_usd, dec!(120));
        assert_eq!(result.totals.annual_usd, dec!(60000));
        assert_eq!(result.totals.monthly_usd, dec!(5000));
        assert_eq!(result.totals.per_patient_usd, dec!(300));
    }

    #[test]
    fn test_allocate_indirect_costs_zero_volume() {
        let items = vec![IndirectCostItemInput {
            category: "Rent".to_string(),
            annual_cost_usd: dec!(24000),
            notes: String::new(),
        }];

        let result = allocate_indirect_costs(Decimal::ZERO, &items).unwrap();

        assert_eq!(result.items[0].per_patient_usd, Decimal::ZERO);
        assert_eq!(result.totals.per_patient_usd, Decimal::ZERO);
        assert_eq!(result.totals.annual_usd, dec!(24000));
    }

    // ==================== apply_markup tests ====================

    #[test]
    fn test_margin_on_raw_non_medical_cost() {
        let settings = PricingSettings::default();
        let result = apply_markup(dec!(100), dec!(100), &ClientType::B2C, &settings).unwrap();

        assert_eq!(result.medical_procedure_cost_usd, dec!(180));
        assert_eq!(result.subtotal_usd, dec!(280));
        // 0.5 of the non-medical 100, not of the 280 subtotal
        assert_eq!(result.profit_amount_usd, dec!(50));
        assert_eq!(result.final_price_usd, dec!(330));
    }
}
