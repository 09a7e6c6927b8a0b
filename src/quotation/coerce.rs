//! Lenient numeric deserialization for quote payloads.
//!
//! Quote forms post numbers, numeric strings, blanks and nulls side by side.
//! Every numeric field goes through [`decimal_or_zero`] or
//! [`optional_decimal`]: blanks and junk count as absent, while a finite
//! number too large for `Decimal` fails deserialization instead of being
//! priced as zero.

use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// A finite number that does not fit in a `Decimal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("number {0} is out of range")]
pub struct OutOfRange(pub String);

/// Deserialize a JSON value into a `Decimal`, falling back to zero.
///
/// Use together with `#[serde(default)]` so absent fields are zero as well.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}

/// Deserialize a JSON value into `Some(Decimal)`, or `None` when it is
/// null, blank or not numeric.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value) => value_to_decimal(&value).map_err(de::Error::custom),
        None => Ok(None),
    }
}

/// Convert an arbitrary JSON value to a `Decimal`.
pub fn value_to_decimal(value: &Value) -> Result<Option<Decimal>, OutOfRange> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(Some(Decimal::from(int)))
            } else if let Some(uint) = number.as_u64() {
                Ok(Some(Decimal::from(uint)))
            } else {
                parse_decimal(&number.to_string())
            }
        }
        Value::String(text) => parse_decimal(text),
        _ => Ok(None),
    }
}

/// Parse a numeric string, accepting plain and scientific notation.
///
/// Blank, malformed and non-finite strings give `None`. Magnitudes below the
/// `Decimal` precision round to zero; magnitudes above its range are an error.
pub fn parse_decimal(text: &str) -> Result<Option<Decimal>, OutOfRange> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(value) = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        return Ok(Some(value));
    }

    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() && float.abs() >= 1.0 => {
            Err(OutOfRange(trimmed.to_string()))
        }
        Ok(float) if float.is_finite() => {
            Ok(Some(Decimal::from_f64(float).unwrap_or(Decimal::ZERO)))
        }
        _ => Ok(None),
    }
}
