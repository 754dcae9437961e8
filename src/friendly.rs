//! Friendly error payloads.
//!
//! Every validation problem leaving the crate is shaped as
//!
//! ```json
//! { "code": 1001, "message": "Validation Failed",
//!   "errors": [{ "code": 2001, "field": "name", "message": "This field is required." }] }
//! ```
//!
//! The per-field entries are also used on their own, e.g. one slot per item in
//! a rejected batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Code of the top-level "validation failed" payload.
pub const VALIDATION_FAILED: u32 = 1001;

/// Message of the top-level "validation failed" payload.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation Failed";

/// Field error codes produced by this crate.
pub mod codes {
    pub const REQUIRED: u32 = 2001;
    pub const INVALID: u32 = 2011;
    pub const NULL: u32 = 2021;
    pub const BLANK: u32 = 2031;
    pub const MAX_LENGTH: u32 = 2041;
    pub const MIN_VALUE: u32 = 2051;
    pub const MAX_VALUE: u32 = 2061;
    pub const INVALID_CHOICE: u32 = 2081;
    pub const UNIQUE: u32 = 2091;
    pub const INVALID_HEX_COLOR: u32 = 2111;
    pub const NOT_A_MAPPING: u32 = 2501;
    pub const UNKNOWN_FIELD: u32 = 2511;
    pub const EXPECTED_LIST: u32 = 2513;
    pub const MISSING_ITEMS: u32 = 2514;
    pub const ITEMS_NOT_LIST: u32 = 2515;
    pub const EMPTY_ITEMS: u32 = 2516;
    pub const BULK_ACTION_FAILED: u32 = 2951;
}

/// One error entry: a code, the offending field (`None` for non-field
/// errors) and a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: u32,
    pub field: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_class_name: Option<String>,
}

impl FieldError {
    pub fn new(code: u32, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code,
            field: field.map(str::to_string),
            message: message.into(),
            keyword: None,
            field_class_name: None,
        }
    }

    /// Error bound to a named field.
    pub fn field(code: u32, field: &str, message: impl Into<String>) -> Self {
        Self::new(code, Some(field), message)
    }

    /// Error not bound to any field.
    pub fn non_field(code: u32, message: impl Into<String>) -> Self {
        Self::new(code, None, message)
    }
}

/// Top-level error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: u32,
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ErrorPayload {
    pub fn new(code: u32, message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            code,
            message: message.into(),
            errors,
        }
    }

    /// The standard "Validation Failed" payload.
    pub fn validation_failed(errors: impl IntoIterator<Item = FieldError>) -> Self {
        Self::new(
            VALIDATION_FAILED,
            VALIDATION_FAILED_MESSAGE,
            errors.into_iter().collect(),
        )
    }

    /// A validation failed payload holding exactly one error.
    pub fn single(code: u32, field: Option<&str>, message: impl Into<String>) -> Self {
        Self::validation_failed([FieldError::new(code, field, message)])
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Payload for a username that is already taken.
pub fn username_duplicated(message: impl Into<String>) -> ErrorPayload {
    ErrorPayload::single(codes::UNIQUE, Some("username"), message)
}

/// Check whether a JSON value is shaped like an [`ErrorPayload`].
///
/// `code` may be an integer or an integer string in `0..10000`; `message`
/// must be a string and `errors` an array.
pub fn is_friendly_errors(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };

    let code = match map.get("code") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    matches!(code, Some(c) if (0..10000).contains(&c))
        && matches!(map.get("message"), Some(Value::String(_)))
        && matches!(map.get("errors"), Some(Value::Array(_)))
}
