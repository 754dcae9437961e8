//! Small reusable value validators.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::friendly::codes;

/// A failed check: friendly error code plus message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub code: u32,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// #0000FF or #00F
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([a-fA-F0-9]{6}|[a-fA-F0-9]{3})$").expect("valid hex color regex"));

/// Validate a HEX color (`#RGB` or `#RRGGBB`).
pub fn hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            codes::INVALID_HEX_COLOR,
            "Enter a valid HEX color.",
        ))
    }
}

/// [`hex_color`] as a schema field validator.
pub fn hex_color_field(value: &Value) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) => hex_color(s),
        None => Err(ValidationError::new(
            codes::INVALID_HEX_COLOR,
            "Enter a valid HEX color.",
        )),
    }
}
