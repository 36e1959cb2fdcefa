//! Lenient field decoders for upstream retailer records.
//!
//! Retailer feeds are uncontrolled: prices arrive as numbers or numeric
//! strings, ids as strings or integers, and any field can be `null` or the
//! wrong type. Every decoder here accepts whatever JSON value is present and
//! maps anything it cannot interpret to `None` (or an empty collection), so
//! decoding a JSON object into a record type never fails.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interprets a JSON number or numeric string as a [`Decimal`].
///
/// Accepts a decimal comma (`"12,95"`) as well as exponent notation.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(&s.trim().replace(',', ".")),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Interprets a JSON string or number as a trimmed, non-empty string.
pub(crate) fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn bool_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn u32_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(string_from_value))
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(bool_from_value))
}

pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(u32_from_value))
}

/// Decodes an array, silently skipping elements that do not decode as `T`.
/// Anything other than an array becomes an empty list.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

/// Decodes an object as `T`, or `None` for non-objects.
pub(crate) fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => T::deserialize(v).ok(),
        _ => None,
    })
}

/// Decodes an object of objects keyed by string, skipping values that do
/// not decode as `T`.
pub(crate) fn lenient_map<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(map)) = value else {
        return Ok(HashMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| T::deserialize(v).ok().map(|t| (k, t)))
        .collect())
}

/// Converts a minor-unit amount (øre) to major units (kroner).
pub(crate) fn minor_to_major(minor: Decimal) -> Decimal {
    minor / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decimal_from_number_and_string() {
        assert_eq!(decimal_from_value(&json!(12.95)), Some(Decimal::new(1295, 2)));
        assert_eq!(decimal_from_value(&json!(1295)), Some(Decimal::from(1295)));
        assert_eq!(decimal_from_value(&json!("12.95")), Some(Decimal::new(1295, 2)));
        assert_eq!(decimal_from_value(&json!(" 12,95 ")), Some(Decimal::new(1295, 2)));
    }

    #[test]
    fn decimal_from_exponent_notation() {
        assert_eq!(decimal_from_value(&json!("1.5e2")), Some(Decimal::from(150)));
    }

    #[test]
    fn decimal_from_garbage_is_none() {
        assert_eq!(decimal_from_value(&json!("gratis")), None);
        assert_eq!(decimal_from_value(&json!("")), None);
        assert_eq!(decimal_from_value(&json!(null)), None);
        assert_eq!(decimal_from_value(&json!({"amount": 5})), None);
        assert_eq!(decimal_from_value(&json!(true)), None);
    }

    #[test]
    fn string_from_value_trims_and_drops_empty() {
        assert_eq!(string_from_value(&json!("  Melk ")), Some("Melk".to_owned()));
        assert_eq!(string_from_value(&json!("   ")), None);
        assert_eq!(string_from_value(&json!(7_038_010_009_457_i64)), Some("7038010009457".to_owned()));
        assert_eq!(string_from_value(&json!(["a"])), None);
    }

    #[test]
    fn bool_from_value_accepts_common_spellings() {
        assert_eq!(bool_from_value(&json!(true)), Some(true));
        assert_eq!(bool_from_value(&json!("yes")), Some(true));
        assert_eq!(bool_from_value(&json!("FALSE")), Some(false));
        assert_eq!(bool_from_value(&json!(0)), Some(false));
        assert_eq!(bool_from_value(&json!("maybe")), None);
    }

    #[test]
    fn u32_from_value_accepts_numeric_strings() {
        assert_eq!(u32_from_value(&json!(1)), Some(1));
        assert_eq!(u32_from_value(&json!("2")), Some(2));
        assert_eq!(u32_from_value(&json!(-1)), None);
    }

    #[test]
    fn minor_to_major_divides_by_hundred() {
        assert_eq!(minor_to_major(Decimal::from(1295)), Decimal::new(1295, 2));
        assert_eq!(minor_to_major(Decimal::from(1995)), Decimal::new(1995, 2));
    }
}
