//! Row values and comparison rules.

use serde_json::Value;
use std::cmp::Ordering;

/// A single table row: a JSON object keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Compares a stored value against a filter value.
///
/// Filter values usually arrive as strings (query parameters), so a string
/// matches a number or boolean with the same textual form. `Null` only
/// matches `Null`.
pub fn loose_eq(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::String(s), other) | (other, Value::String(s)) => match other {
            Value::String(o) => s == o,
            Value::Number(n) => *s == n.to_string(),
            Value::Bool(b) => *s == b.to_string(),
            _ => false,
        },
        _ => stored == wanted,
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

/// Ascending order over optional values with missing and `null` last.
///
/// Values of different JSON types are ordered by type first. Reversing the
/// result gives descending order with nulls first, as PostgreSQL does.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_matches_number() {
        assert!(loose_eq(&json!(5), &json!("5")));
        assert!(loose_eq(&json!("5"), &json!(5)));
        assert!(!loose_eq(&json!(5), &json!("6")));
    }

    #[test]
    fn string_matches_bool() {
        assert!(loose_eq(&json!(true), &json!("true")));
        assert!(!loose_eq(&json!(false), &json!("true")));
    }

    #[test]
    fn null_only_matches_null() {
        assert!(loose_eq(&Value::Null, &Value::Null));
        assert!(!loose_eq(&Value::Null, &json!("null")));
        assert!(!loose_eq(&json!(0), &Value::Null));
    }

    #[test]
    fn integer_and_float_compare_numerically() {
        assert!(loose_eq(&json!(2), &json!(2.0)));
    }

    #[test]
    fn nulls_sort_last() {
        assert_eq!(compare_values(Some(&json!(1)), None), Ordering::Less);
        assert_eq!(compare_values(None, Some(&json!("a"))), Ordering::Greater);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }

    #[test]
    fn numbers_sort_numerically() {
        assert_eq!(
            compare_values(Some(&json!(9)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(1.5)), Some(&json!(1))),
            Ordering::Greater
        );
    }
}
