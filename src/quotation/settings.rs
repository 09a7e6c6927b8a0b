//! Versioned markup/margin configuration and the client-type switch.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use super::coerce::optional_decimal;

/// Current pricing rule version. Older payloads are normalized onto it.
pub const PRICING_SETTINGS_VERSION: u32 = 1;

/// Business rules applied by the markup/margin stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSettings {
    pub version: u32,
    pub b2b_medical_markup_multiplier: Decimal,
    pub b2c_medical_markup_multiplier: Decimal,
    pub b2b_non_medical_margin_rate: Decimal,
    pub b2c_non_medical_margin_rate: Decimal,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            version: PRICING_SETTINGS_VERSION,
            b2b_medical_markup_multiplier: dec!(1.62),
            b2c_medical_markup_multiplier: dec!(1.8),
            b2b_non_medical_margin_rate: dec!(0.35),
            b2c_non_medical_margin_rate: dec!(0.5),
        }
    }
}

impl PricingSettings {
    /// Repair a settings payload against `defaults`.
    ///
    /// Multipliers must be strictly positive (otherwise the default is used),
    /// margin rates are clamped at zero and the version is pinned to the
    /// current one.
    pub fn normalize(&self, defaults: &PricingSettings) -> PricingSettings {
        PricingSettings {
            version: PRICING_SETTINGS_VERSION,
            b2b_medical_markup_multiplier: positive_or(
                self.b2b_medical_markup_multiplier,
                defaults.b2b_medical_markup_multiplier,
            ),
            b2c_medical_markup_multiplier: positive_or(
                self.b2c_medical_markup_multiplier,
                defaults.b2c_medical_markup_multiplier,
            ),
            b2b_non_medical_margin_rate: self.b2b_non_medical_margin_rate.max(Decimal::ZERO),
            b2c_non_medical_margin_rate: self.b2c_non_medical_margin_rate.max(Decimal::ZERO),
        }
    }
}

fn positive_or(value: Decimal, fallback: Decimal) -> Decimal {
    if value > Decimal::ZERO {
        value
    } else {
        fallback
    }
}

/// Pricing settings as posted with a quote.
///
/// Every field may be missing, null or junk; such fields take the configured
/// default in [`PricingSettingsInput::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingSettingsInput {
    #[serde(deserialize_with = "optional_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(deserialize_with = "optional_decimal", skip_serializing_if = "Option::is_none")]
    pub b2b_medical_markup_multiplier: Option<Decimal>,
    #[serde(deserialize_with = "optional_decimal", skip_serializing_if = "Option::is_none")]
    pub b2c_medical_markup_multiplier: Option<Decimal>,
    #[serde(deserialize_with = "optional_decimal", skip_serializing_if = "Option::is_none")]
    pub b2b_non_medical_margin_rate: Option<Decimal>,
    #[serde(deserialize_with = "optional_decimal", skip_serializing_if = "Option::is_none")]
    pub b2c_non_medical_margin_rate: Option<Decimal>,
}

impl PricingSettingsInput {
    /// Fill absent fields from `defaults`, then normalize.
    pub fn resolve(&self, defaults: &PricingSettings) -> PricingSettings {
        PricingSettings {
            version: PRICING_SETTINGS_VERSION,
            b2b_medical_markup_multiplier: self
                .b2b_medical_markup_multiplier
                .unwrap_or(defaults.b2b_medical_markup_multiplier),
            b2c_medical_markup_multiplier: self
                .b2c_medical_markup_multiplier
                .unwrap_or(defaults.b2c_medical_markup_multiplier),
            b2b_non_medical_margin_rate: self
                .b2b_non_medical_margin_rate
                .unwrap_or(defaults.b2b_non_medical_margin_rate),
            b2c_non_medical_margin_rate: self
                .b2c_non_medical_margin_rate
                .unwrap_or(defaults.b2c_non_medical_margin_rate),
        }
        .normalize(defaults)
    }
}

impl From<PricingSettings> for PricingSettingsInput {
    fn from(settings: PricingSettings) -> Self {
        Self {
            version: Some(settings.version),
            b2b_medical_markup_multiplier: Some(settings.b2b_medical_markup_multiplier),
            b2c_medical_markup_multiplier: Some(settings.b2c_medical_markup_multiplier),
            b2b_non_medical_margin_rate: Some(settings.b2b_non_medical_margin_rate),
            b2c_non_medical_margin_rate: Some(settings.b2c_non_medical_margin_rate),
        }
    }
}

/// Version numbers arrive as numbers or numeric strings; anything else is absent.
fn optional_version<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_decimal(deserializer)?.and_then(|version| version.to_u32()))
}

/// Client category driving the markup/margin choice.
///
/// Anything that is not B2B prices with the B2C rule. `Other` keeps the raw
/// value so callers can flag quotes whose client type was never set properly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientType {
    B2B,
    B2C,
    Other(String),
}

impl ClientType {
    /// Parse a free-text client type (case-insensitive, surrounding whitespace ignored).
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "B2B" => ClientType::B2B,
            "B2C" => ClientType::B2C,
            _ => ClientType::Other(raw.trim().to_string()),
        }
    }

    pub fn is_b2b(&self) -> bool {
        matches!(self, ClientType::B2B)
    }

    /// Rule label actually applied to this client.
    pub fn pricing_rule(&self) -> &'static str {
        if self.is_b2b() {
            "B2B"
        } else {
            "B2C"
        }
    }
}

/// Multiplier applied to the medical cost.
pub fn medical_markup_multiplier(client: &ClientType, settings: &PricingSettings) -> Decimal {
    if client.is_b2b() {
        settings.b2b_medical_markup_multiplier
    } else {
        settings.b2c_medical_markup_multiplier
    }
}

/// Margin rate applied to the raw non-medical cost.
pub fn non_medical_margin_rate(client: &ClientType, settings: &PricingSettings) -> Decimal {
    if client.is_b2b() {
        settings.b2b_non_medical_margin_rate
    } else {
        settings.b2c_non_medical_margin_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PricingSettings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.b2b_medical_markup_multiplier, dec!(1.62));
        assert_eq!(settings.b2c_medical_markup_multiplier, dec!(1.8));
        assert_eq!(settings.b2b_non_medical_margin_rate, dec!(0.35));
        assert_eq!(settings.b2c_non_medical_margin_rate, dec!(0.5));
    }

    #[test]
    fn test_client_type_parse() {
        assert_eq!(ClientType::parse("B2B"), ClientType::B2B);
        assert_eq!(ClientType::parse(" b2b "), ClientType::B2B);
        assert_eq!(ClientType::parse("b2c"), ClientType::B2C);
        assert_eq!(ClientType::parse(""), ClientType::Other(String::new()));
        assert_eq!(
            ClientType::parse("Agency"),
            ClientType::Other("Agency".to_string())
        );
    }

    #[test]
    fn test_unknown_client_type_uses_b2c_rule() {
        let settings = PricingSettings::default();
        let other = ClientType::parse("wholesale");

        assert_eq!(other.pricing_rule(), "B2C");
        assert_eq!(medical_markup_multiplier(&other, &settings), dec!(1.8));
        assert_eq!(non_medical_margin_rate(&other, &settings), dec!(0.5));
    }

    #[test]
    fn test_b2b_selection() {
        let settings = PricingSettings::default();
        assert_eq!(medical_markup_multiplier(&ClientType::B2B, &settings), dec!(1.62));
        assert_eq!(non_medical_margin_rate(&ClientType::B2B, &settings), dec!(0.35));
    }

    #[test]
    fn test_normalize_repairs_invalid_values() {
        let defaults = PricingSettings::default();
        let broken = PricingSettings {
            version: 7,
            b2b_medical_markup_multiplier: Decimal::ZERO,
            b2c_medical_markup_multiplier: dec!(-2),
            b2b_non_medical_margin_rate: dec!(-0.1),
            b2c_non_medical_margin_rate: dec!(0.25),
        };

        let normalized = broken.normalize(&defaults);

        assert_eq!(normalized.version, PRICING_SETTINGS_VERSION);
        assert_eq!(normalized.b2b_medical_markup_multiplier, dec!(1.62));
        assert_eq!(normalized.b2c_medical_markup_multiplier, dec!(1.8));
        assert_eq!(normalized.b2b_non_medical_margin_rate, Decimal::ZERO);
        assert_eq!(normalized.b2c_non_medical_margin_rate, dec!(0.25));
    }

    fn configured() -> PricingSettings {
        PricingSettings {
            b2b_medical_markup_multiplier: dec!(1.5),
            b2b_non_medical_margin_rate: dec!(0.4),
            b2c_non_medical_margin_rate: dec!(0.45),
            ..PricingSettings::default()
        }
    }

    #[test]
    fn test_partial_settings_take_configured_defaults() {
        let parsed: PricingSettingsInput = serde_json::from_str(
            r#"{"b2bNonMedicalMarginRate": null, "b2cMedicalMarkupMultiplier": 2}"#,
        )
        .unwrap();

        let settings = parsed.resolve(&configured());

        assert_eq!(settings.b2c_medical_markup_multiplier, dec!(2));
        assert_eq!(settings.b2b_medical_markup_multiplier, dec!(1.5));
        assert_eq!(settings.b2b_non_medical_margin_rate, dec!(0.4));
        assert_eq!(settings.b2c_non_medical_margin_rate, dec!(0.45));
    }

    #[test]
    fn test_junk_settings_take_configured_defaults() {
        let parsed: PricingSettingsInput = serde_json::from_str(
            r#"{"version": "1", "b2bMedicalMarkupMultiplier": "abc", "b2cNonMedicalMarginRate": ""}"#,
        )
        .unwrap();
        assert_eq!(parsed.version, Some(1));

        let settings = parsed.resolve(&configured());
        assert_eq!(settings.b2b_medical_markup_multiplier, dec!(1.5));
        assert_eq!(settings.b2c_non_medical_margin_rate, dec!(0.45));
    }

    #[test]
    fn test_explicit_zero_margin_is_kept() {
        let parsed: PricingSettingsInput =
            serde_json::from_str(r#"{"b2bNonMedicalMarginRate": 0, "b2bMedicalMarkupMultiplier": 0}"#)
                .unwrap();

        let settings = parsed.resolve(&configured());
        assert_eq!(settings.b2b_non_medical_margin_rate, Decimal::ZERO);
        // Multipliers must stay positive.
        assert_eq!(settings.b2b_medical_markup_multiplier, dec!(1.5));
    }

    #[test]
    fn test_settings_round_trip_through_input() {
        let input = PricingSettingsInput::from(configured());
        assert_eq!(input.resolve(&PricingSettings::default()), configured());
    }
}
