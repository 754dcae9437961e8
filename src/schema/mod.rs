//! Schemas - per-item validation and representation.
//!
//! A schema turns an incoming item into a normalized [`Record`] (or a list of
//! field errors) and turns stored records back into response values.
//!
//! ## Example
//!
//! ```
//! use restkit::schema::{Field, RecordSchema, Schema};
//! use serde_json::json;
//!
//! let schema = RecordSchema::new()
//!     .field(Field::integer("id").read_only())
//!     .field(Field::string("name").required().max_length(20));
//!
//! let ok = schema.validate(&json!({ "name": "Mug" }), false).unwrap();
//! assert_eq!(ok.get("name"), Some(&json!("Mug")));
//!
//! let errors = schema.validate(&json!({}), false).unwrap_err();
//! assert_eq!(errors[0].field.as_deref(), Some("name"));
//! ```

mod dynamic;
mod field;
mod inheritance;
mod record_schema;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::friendly::FieldError;
use crate::record::Record;

pub use dynamic::{DynamicFields, FieldSelection};
pub use field::{Field, FieldKind, Validator};
pub use inheritance::InheritanceSchema;
pub use record_schema::RecordSchema;

/// Schema misconfiguration detected while representing records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema for {model} declares no subtypes")]
    MissingSubtypes { model: String },
    #[error("unknown subtype {subtype:?} of {model}, check the subtypes registered on its schema")]
    UnknownSubtype { subtype: String, model: String },
}

/// Validation and representation rules for one kind of record.
pub trait Schema: Send + Sync {
    /// Validate one item. With `partial` set, absent fields are neither
    /// required nor defaulted.
    fn validate(&self, item: &Value, partial: bool) -> Result<Record, Vec<FieldError>>;

    /// Turn a stored record into its response value.
    fn represent(&self, record: &Record) -> Result<Value, SchemaError> {
        Ok(Value::Object(record.clone()))
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn validate(&self, item: &Value, partial: bool) -> Result<Record, Vec<FieldError>> {
        (**self).validate(item, partial)
    }

    fn represent(&self, record: &Record) -> Result<Value, SchemaError> {
        (**self).represent(record)
    }
}

impl<S: Schema + ?Sized> Schema for &S {
    fn validate(&self, item: &Value, partial: bool) -> Result<Record, Vec<FieldError>> {
        (**self).validate(item, partial)
    }

    fn represent(&self, record: &Record) -> Result<Value, SchemaError> {
        (**self).represent(record)
    }
}
