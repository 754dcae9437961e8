//! Records - the unit of data flowing through stores, schemas and handlers.
//!
//! A record is a plain JSON object. Primary keys are compared by their
//! textual form so that `1` (from a JSON body) and `"1"` (from a query
//! string) address the same record.

use serde_json::{Map, Value};

/// A single item or stored record: field name -> value.
pub type Record = Map<String, Value>;

/// Normalize a primary-key value into its lookup key.
///
/// Strings are used as-is and numbers by their decimal form. Null, booleans,
/// arrays and objects can never address a record.
pub fn pk_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns true when both values address the same record.
pub fn same_pk(a: &Value, b: &Value) -> bool {
    match (pk_key(a), pk_key(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Equality used by filter lookups.
///
/// Exact JSON equality, or a string compared against a scalar by the
/// scalar's textual form.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::String(s), other) | (other, Value::String(s)) => match other {
            Value::Number(n) => {
                if n.to_string() == *s {
                    return true;
                }
                match (s.trim().parse::<f64>(), n.as_f64()) {
                    (Ok(parsed), Some(n)) => parsed == n,
                    _ => false,
                }
            }
            Value::Bool(flag) => s.eq_ignore_ascii_case(if *flag { "true" } else { "false" }),
            _ => false,
        },
        _ => false,
    }
}

/// Numeric view of a value, accepting numeric strings.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
