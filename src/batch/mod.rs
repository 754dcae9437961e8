//! Batch endpoint - one request carrying many items.
//!
//! - `PUT` replaces the (filtered) collection with the submitted items.
//! - `POST` adds the submitted items, keeping everything else.
//! - `PATCH` updates the submitted items by primary key. Items whose key is
//!   missing or unknown are skipped and reported as `null`.
//!
//! Every item is validated before anything is written. One invalid item
//! rejects the whole batch with one error slot per item.
//!
//! ## Example
//!
//! ```
//! use restkit::batch::{BatchHandler, BatchMethod, BatchResponse};
//! use restkit::schema::{Field, RecordSchema};
//! use restkit::store::InMemoryStore;
//! use serde_json::json;
//!
//! let store = InMemoryStore::new("id");
//! let schema = RecordSchema::new()
//!     .field(Field::integer("id").read_only())
//!     .field(Field::string("sku").required());
//!
//! let response = BatchHandler::new(&store, &schema)
//!     .execute(BatchMethod::Append, &json!({ "items": [{ "sku": "X" }] }), &Default::default())
//!     .unwrap();
//!
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.to_body(), json!({ "items": [{ "id": 1, "sku": "X" }] }));
//! ```

mod handler;
mod settings;

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};
use thiserror::Error;

use crate::friendly::{ErrorPayload, FieldError};
use crate::schema::SchemaError;
use crate::store::StoreError;

pub use handler::BatchHandler;
pub use settings::{BatchSettings, CreateMethod};

/// The batch operation selected by the HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchMethod {
    /// `PUT`
    Replace,
    /// `POST`
    Append,
    /// `PATCH`
    Update,
}

impl BatchMethod {
    pub fn http_method(&self) -> &'static str {
        match self {
            BatchMethod::Replace => "PUT",
            BatchMethod::Append => "POST",
            BatchMethod::Update => "PATCH",
        }
    }

    /// Whether items are validated with partial-field semantics.
    pub fn is_partial(&self) -> bool {
        matches!(self, BatchMethod::Update)
    }
}

impl fmt::Display for BatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.http_method())
    }
}

impl FromStr for BatchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PUT" => Ok(BatchMethod::Replace),
            "POST" => Ok(BatchMethod::Append),
            "PATCH" => Ok(BatchMethod::Update),
            other => Err(format!("unsupported batch method: {}", other)),
        }
    }
}

/// Outcome of a batch request.
///
/// `Items` and `Errors` mirror the order of the submitted items.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchResponse {
    /// All items committed. `None` marks a skipped PATCH item.
    Items(Vec<Option<Value>>),
    /// Validation failed; nothing was written. `None` marks a valid item.
    Errors(Vec<Option<Vec<FieldError>>>),
    /// The request envelope or its filter parameters were malformed.
    Invalid(ErrorPayload),
}

impl BatchResponse {
    /// HTTP-style status code.
    pub fn status(&self) -> u16 {
        match self {
            BatchResponse::Items(_) => 200,
            BatchResponse::Errors(_) | BatchResponse::Invalid(_) => 400,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchResponse::Items(_))
    }

    /// Response body: `{"items": [...]}`, `{"errors": [...]}` or an error
    /// payload.
    pub fn to_body(&self) -> Value {
        match self {
            BatchResponse::Items(items) => json!({ "items": items }),
            BatchResponse::Errors(errors) => json!({ "errors": errors }),
            BatchResponse::Invalid(payload) => payload.to_value(),
        }
    }
}

/// Fatal batch failures. Request problems are reported through
/// [`BatchResponse`] instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::friendly::codes;

    #[test]
    fn methods_from_http() {
        assert_eq!("put".parse::<BatchMethod>(), Ok(BatchMethod::Replace));
        assert_eq!("POST".parse::<BatchMethod>(), Ok(BatchMethod::Append));
        assert_eq!("Patch".parse::<BatchMethod>(), Ok(BatchMethod::Update));
        assert!("DELETE".parse::<BatchMethod>().is_err());
        assert!(BatchMethod::Update.is_partial());
        assert!(!BatchMethod::Replace.is_partial());
    }

    #[test]
    fn bodies_and_statuses() {
        let items = BatchResponse::Items(vec![Some(json!({ "id": 1 })), None]);
        assert_eq!(items.status(), 200);
        assert_eq!(items.to_body(), json!({ "items": [{ "id": 1 }, null] }));

        let errors = BatchResponse::Errors(vec![
            None,
            Some(vec![FieldError::field(codes::REQUIRED, "sku", "This field is required.")]),
        ]);
        assert_eq!(errors.status(), 400);
        assert_eq!(
            errors.to_body(),
            json!({ "errors": [null, [{ "code": 2001, "field": "sku", "message": "This field is required." }]] })
        );
    }
}
