//! InheritanceSchema - one endpoint serving several record subtypes.
//!
//! A discriminator field names the subtype of each record; validation and
//! representation are delegated to the schema registered for it.
//!
//! ```
//! use restkit::schema::{Field, InheritanceSchema, RecordSchema, Schema};
//! use serde_json::json;
//!
//! let animals = InheritanceSchema::new("Animal", "kind")
//!     .subtype("dog", RecordSchema::new().field(Field::boolean("good")))
//!     .subtype("cat", RecordSchema::new().field(Field::integer("lives")));
//!
//! let dog = animals.validate(&json!({ "kind": "dog", "good": "yes" }), false).unwrap();
//! assert_eq!(dog.get("good"), Some(&json!(true)));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::{Schema, SchemaError};
use crate::friendly::{codes, FieldError};
use crate::record::Record;

pub struct InheritanceSchema {
    model: String,
    discriminator: String,
    subtypes: BTreeMap<String, Arc<dyn Schema>>,
}

impl InheritanceSchema {
    pub fn new(model: &str, discriminator: &str) -> Self {
        Self {
            model: model.to_string(),
            discriminator: discriminator.to_string(),
            subtypes: BTreeMap::new(),
        }
    }

    /// Register the schema used for records whose discriminator is `name`.
    pub fn subtype<S: Schema + 'static>(mut self, name: &str, schema: S) -> Self {
        self.subtypes.insert(name.to_string(), Arc::new(schema));
        self
    }

    fn subtype_of<'a>(&self, fields: &'a Record) -> Option<&'a str> {
        fields.get(&self.discriminator).and_then(Value::as_str)
    }
}

impl Schema for InheritanceSchema {
    fn validate(&self, item: &Value, partial: bool) -> Result<Record, Vec<FieldError>> {
        let Some(input) = item.as_object() else {
            return Err(vec![FieldError::non_field(
                codes::NOT_A_MAPPING,
                "Invalid data. Expected a dictionary.",
            )]);
        };

        // The subtype is needed to pick a schema, so it is required even
        // for partial updates.
        let Some(subtype) = self.subtype_of(input) else {
            return Err(vec![FieldError::field(
                codes::REQUIRED,
                &self.discriminator,
                "This field is required.",
            )]);
        };

        let Some(schema) = self.subtypes.get(subtype) else {
            return Err(vec![FieldError::field(
                codes::INVALID_CHOICE,
                &self.discriminator,
                format!("\"{}\" is not a valid choice.", subtype),
            )]);
        };

        let mut cleaned = schema.validate(item, partial)?;
        cleaned.insert(
            self.discriminator.clone(),
            Value::String(subtype.to_string()),
        );
        Ok(cleaned)
    }

    fn represent(&self, record: &Record) -> Result<Value, SchemaError> {
        if self.subtypes.is_empty() {
            return Err(SchemaError::MissingSubtypes {
                model: self.model.clone(),
            });
        }

        let subtype = self.subtype_of(record).unwrap_or_default();
        let schema = self
            .subtypes
            .get(subtype)
            .ok_or_else(|| SchemaError::UnknownSubtype {
                subtype: subtype.to_string(),
                model: self.model.clone(),
            })?;
        schema.represent(record)
    }
}
