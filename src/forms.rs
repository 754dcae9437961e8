//! Form errors - translation between form errors and friendly error payloads.
//!
//! A [`Form`] here is the error-bearing side of a form: its declared fields
//! (name and field class) and the errors collected against them. Two
//! directions are supported:
//!
//! - [`apply_error_payload`] copies the errors of a remote API response onto
//!   a local form;
//! - [`form_errors_to_payload`] renders a form's errors as an
//!   [`ErrorPayload`], looking codes up in an [`ErrorCodes`] table.
//!
//! ## Example
//!
//! ```
//! use restkit::forms::{form_errors_to_payload, ErrorCodes, Form, PayloadOptions};
//!
//! let mut form = Form::new().field("password", "CharField");
//! form.add_error(Some("password"), Some("password_mismatch"), "Passwords differ.");
//!
//! let payload = form_errors_to_payload(&form, &ErrorCodes::default(), PayloadOptions::default()).unwrap();
//! assert_eq!(payload.code, 1001);
//! assert_eq!(payload.errors[0].code, 2017);
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::friendly::{codes, ErrorPayload, FieldError, VALIDATION_FAILED};

/// Error codes for form errors, keyed by field class and error keyword.
///
/// Deserialized tables extend the defaults instead of replacing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ErrorCodeOverrides")]
pub struct ErrorCodes {
    pub fields: BTreeMap<String, BTreeMap<String, u32>>,
    pub non_field: BTreeMap<String, u32>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ErrorCodeOverrides {
    fields: BTreeMap<String, BTreeMap<String, u32>>,
    non_field: BTreeMap<String, u32>,
}

impl From<ErrorCodeOverrides> for ErrorCodes {
    fn from(overrides: ErrorCodeOverrides) -> Self {
        let mut table = ErrorCodes::default();
        for (class_name, keywords) in overrides.fields {
            table.fields.entry(class_name).or_default().extend(keywords);
        }
        table.non_field.extend(overrides.non_field);
        table
    }
}

impl Default for ErrorCodes {
    fn default() -> Self {
        let table = |pairs: &[(&str, u32)]| -> BTreeMap<String, u32> {
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };

        let mut fields = BTreeMap::new();
        fields.insert(
            "CharField".to_string(),
            table(&[
                ("password_incorrect", 2016),
                ("password_mismatch", 2017),
                ("not_editable", 2501),
                ("invalid_token", 2502),
                ("token_expired", 2503),
            ]),
        );
        fields.insert(
            "ModelChoiceField".to_string(),
            table(&[("required", 2004), ("null", 2024), ("invalid_choice", 2081)]),
        );

        Self {
            fields,
            non_field: table(&[("already_copied", 1501)]),
        }
    }
}

impl ErrorCodes {
    pub fn field_code(&self, class_name: &str, keyword: &str) -> Option<u32> {
        self.fields.get(class_name)?.get(keyword).copied()
    }

    pub fn non_field_code(&self, keyword: &str) -> Option<u32> {
        self.non_field.get(keyword).copied()
    }

    /// Register a code for errors of `keyword` on fields of `class_name`.
    pub fn with_field_code(mut self, class_name: &str, keyword: &str, code: u32) -> Self {
        self.fields
            .entry(class_name.to_string())
            .or_default()
            .insert(keyword.to_string(), code);
        self
    }

    pub fn with_non_field_code(mut self, keyword: &str, code: u32) -> Self {
        self.non_field.insert(keyword.to_string(), code);
        self
    }
}

/// A declared form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub class_name: String,
}

/// One error collected on a form. `field` is `None` for non-field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub field: Option<String>,
    pub keyword: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<FormField>,
    errors: Vec<FormError>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, class_name: &str) -> Self {
        self.fields.push(FormField {
            name: name.to_string(),
            class_name: class_name.to_string(),
        });
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn field_class(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.class_name.as_str())
    }

    pub fn add_error(&mut self, field: Option<&str>, keyword: Option<&str>, message: impl Into<String>) {
        self.errors.push(FormError {
            field: field.map(str::to_string),
            keyword: keyword.map(str::to_string),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[FormError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field_errors(&self, name: &str) -> Vec<&FormError> {
        self.errors
            .iter()
            .filter(|e| e.field.as_deref() == Some(name))
            .collect()
    }

    pub fn non_field_errors(&self) -> Vec<&FormError> {
        self.errors.iter().filter(|e| e.field.is_none()).collect()
    }
}

/// Copy the errors of a validation-failed response onto `form`.
///
/// `mapping` renames response fields to form fields. Each error lands on the
/// mapped field if the form declares it, else on the same-named field, else
/// becomes a non-field error. Returns `false`, leaving the form untouched,
/// unless the payload's code is the validation-failed code.
pub fn apply_error_payload(
    form: &mut Form,
    payload: &Value,
    mapping: &HashMap<String, String>,
) -> bool {
    let code = match payload.get("code") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if code != Some(u64::from(VALIDATION_FAILED)) {
        debug!(?code, "error payload not applied to form");
        return false;
    }

    let errors = payload
        .get("errors")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for error in errors {
        let field = error.get("field").and_then(Value::as_str);
        let message = error.get("message").and_then(Value::as_str).unwrap_or_default();
        let keyword = error.get("keyword").and_then(Value::as_str);

        let target = field
            .and_then(|f| mapping.get(f))
            .map(String::as_str)
            .filter(|f| form.has_field(f))
            .or_else(|| field.filter(|f| form.has_field(f)));

        form.add_error(target, keyword, message);
    }
    true
}

/// Output switches of [`form_errors_to_payload`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadOptions {
    pub show_keyword: bool,
    pub show_field_class_name: bool,
}

impl PayloadOptions {
    pub fn show_keyword(mut self) -> Self {
        self.show_keyword = true;
        self
    }

    pub fn show_field_class_name(mut self) -> Self {
        self.show_field_class_name = true;
        self
    }
}

/// Render a form's errors as a validation-failed payload, `None` if the form
/// has no errors.
///
/// Errors whose keyword has no registered code get [`codes::INVALID`].
pub fn form_errors_to_payload(
    form: &Form,
    error_codes: &ErrorCodes,
    options: PayloadOptions,
) -> Option<ErrorPayload> {
    if form.is_valid() {
        return None;
    }

    let errors = form.errors().iter().map(|error| {
        let keyword = error.keyword.as_deref();
        let (class_name, code) = match error.field.as_deref() {
            None => (None, keyword.and_then(|k| error_codes.non_field_code(k))),
            Some(name) => {
                let class_name = form.field_class(name);
                let code = class_name
                    .zip(keyword)
                    .and_then(|(class_name, k)| error_codes.field_code(class_name, k));
                (class_name, code)
            }
        };

        let mut out = FieldError::new(
            code.unwrap_or(codes::INVALID),
            error.field.as_deref(),
            error.message.clone(),
        );
        if options.show_keyword {
            out.keyword = error.keyword.clone();
        }
        if options.show_field_class_name {
            out.field_class_name = class_name.map(str::to_string);
        }
        out
    });

    Some(ErrorPayload::validation_failed(errors))
}
