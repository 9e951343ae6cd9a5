//! Lenient column decoders.
//!
//! Rows come from hand-written seeds and free-form writes, so a column may
//! hold `null`, a number where a string is expected, or a numeric string.
//! `null` decodes to the field's zero value.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Row id from a string or a number.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(id) => Ok(Some(id)),
        Value::Number(id) => Ok(Some(id.to_string())),
        other => Err(D::Error::custom(format!("invalid id: {other}"))),
    }
}

/// Amount from a number, a numeric string or `null`.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("invalid amount: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid amount: {s:?}"))),
        other => Err(D::Error::custom(format!("invalid amount: {other}"))),
    }
}

/// Whole count from a number, a numeric string or `null`.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let invalid = |v: &dyn std::fmt::Display| D::Error::custom(format!("invalid count: {v}"));
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
            _ => Err(invalid(&n)),
        },
        Value::String(s) => s.trim().parse().map_err(|_| invalid(&s)),
        other => Err(invalid(&other)),
    }
}

/// Text column, `null` as empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
