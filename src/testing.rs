//! Assertions for friendly error responses, for use in tests.
//!
//! ```
//! use restkit::testing::{assert_friendly_error, Expect};
//! use serde_json::json;
//!
//! let body = json!({
//!     "code": 1001,
//!     "message": "Validation Failed",
//!     "errors": [{ "code": 2001, "field": "name", "message": "This field is required." }]
//! });
//! assert_friendly_error(400, &body, Expect::new().code(2001).field("name"));
//! ```

use serde_json::Value;

use crate::friendly::{VALIDATION_FAILED, VALIDATION_FAILED_MESSAGE};

/// Expected parts of one error entry. Unset parts are not asserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expect {
    code: Option<u32>,
    field: Option<Option<String>>,
    message: Option<String>,
}

impl Expect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(Some(field.to_string()));
        self
    }

    /// Expect a non-field error (`"field": null`).
    pub fn non_field(mut self) -> Self {
        self.field = Some(None);
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    fn check(&self, error: &Value, body: &Value) {
        if let Some(code) = self.code {
            assert_eq!(code_of(error), Some(u64::from(code)), "error code in {}", body);
        }
        if let Some(field) = &self.field {
            let actual = error.get("field").and_then(Value::as_str);
            assert_eq!(actual, field.as_deref(), "error field in {}", body);
        }
        if let Some(message) = &self.message {
            let actual = error.get("message").and_then(Value::as_str);
            assert_eq!(actual, Some(message.as_str()), "error message in {}", body);
        }
    }
}

/// Expected status and top-level code/message of an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub status: u16,
    pub code: u32,
    pub message: String,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            status: 400,
            code: VALIDATION_FAILED,
            message: VALIDATION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Integer or integer-string code of a payload or error entry.
fn code_of(value: &Value) -> Option<u64> {
    match value.get("code")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Assert a 400 validation-failed response holding exactly one error.
#[track_caller]
pub fn assert_friendly_error(status: u16, body: &Value, expect: Expect) {
    assert_friendly_errors_with(&Envelope::default(), status, body, &[expect]);
}

/// Assert a 400 validation-failed response holding the expected errors, in
/// order.
#[track_caller]
pub fn assert_friendly_errors(status: u16, body: &Value, expected: &[Expect]) {
    assert_friendly_errors_with(&Envelope::default(), status, body, expected);
}

#[track_caller]
pub fn assert_friendly_errors_with(envelope: &Envelope, status: u16, body: &Value, expected: &[Expect]) {
    assert_eq!(status, envelope.status, "status of {}", body);
    assert_eq!(code_of(body), Some(u64::from(envelope.code)), "code of {}", body);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(envelope.message.as_str()),
        "message of {}",
        body
    );

    let errors = body
        .get("errors")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("no errors array in {}", body));
    assert_eq!(errors.len(), expected.len(), "error count in {}", body);
    for (error, expect) in errors.iter().zip(expected) {
        expect.check(error, body);
    }
}
