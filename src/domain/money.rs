//! JSON codec for monetary amounts.
//!
//! Amounts are stored as plain JSON numbers for compatibility with existing
//! storefront data. Reading goes through the number's shortest decimal text,
//! so a stored `19.99` becomes exactly `19.99` rather than its binary
//! approximation. Numeric strings are accepted as well.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{de, ser, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    match amount.to_string().parse::<f64>() {
        Ok(value) if value.is_finite() => serializer.serialize_f64(value),
        _ => Err(ser::Error::custom(format!(
            "amount {amount} is not representable as a JSON number"
        ))),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    };
    parse(&text).map_err(de::Error::custom)
}

/// Parse a decimal amount such as `"9.99"`.
pub fn parse(text: &str) -> Result<BigDecimal, String> {
    BigDecimal::from_str(text.trim()).map_err(|e| format!("invalid amount '{}': {}", text, e))
}

/// Largest magnitude (exclusive) that still fits an `f64` exactly at two
/// decimal places.
const STORABLE_LIMIT: i64 = 10_000_000_000_000;

/// Amounts are persisted as JSON numbers, so only those with at most two
/// decimal places and fewer than 14 integer digits reload unchanged.
pub fn check_storable(amount: &BigDecimal) -> Result<(), String> {
    if amount.with_scale(2) != *amount {
        return Err(format!("amount {} has more than two decimal places", amount));
    }
    if amount.abs() >= BigDecimal::from(STORABLE_LIMIT) {
        return Err(format!("amount {} is too large", amount));
    }
    Ok(())
}

/// Two-decimal rendering used by the HTTP layer, e.g. `"39.98"`.
pub fn to_price_string(amount: &BigDecimal) -> String {
    let rounded = amount.with_scale_round(2, RoundingMode::HalfUp);
    match (&rounded * BigDecimal::from(100)).to_i128() {
        Some(cents) => {
            let sign = if cents < 0 { "-" } else { "" };
            let cents = cents.unsigned_abs();
            format!("{}{}.{:02}", sign, cents / 100, cents % 100)
        }
        None => rounded.to_string(),
    }
}
