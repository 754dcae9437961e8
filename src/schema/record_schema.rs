//! RecordSchema - declarative schema built from [`Field`]s.

use serde_json::Value;

use super::field::Field;
use super::{Schema, SchemaError};
use crate::friendly::{codes, FieldError};
use crate::record::Record;

/// A schema made of declared fields.
///
/// Undeclared input fields are ignored unless the schema is [`strict`].
///
/// [`strict`]: RecordSchema::strict
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    fields: Vec<Field>,
    strict: bool,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Reject input fields that are not declared.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl Schema for RecordSchema {
    fn validate(&self, item: &Value, partial: bool) -> Result<Record, Vec<FieldError>> {
        let Some(input) = item.as_object() else {
            return Err(vec![FieldError::non_field(
                codes::NOT_A_MAPPING,
                "Invalid data. Expected a dictionary.",
            )]);
        };

        let mut cleaned = Record::new();
        let mut errors = Vec::new();

        for field in &self.fields {
            if field.read_only {
                continue;
            }
            match input.get(&field.name) {
                Some(value) => match field.clean(value) {
                    Ok(value) => {
                        cleaned.insert(field.name.clone(), value);
                    }
                    Err(e) => errors.push(e),
                },
                None if partial => {}
                None => {
                    if let Some(default) = &field.default {
                        cleaned.insert(field.name.clone(), default.clone());
                    } else if field.required {
                        errors.push(FieldError::field(
                            codes::REQUIRED,
                            &field.name,
                            "This field is required.",
                        ));
                    }
                }
            }
        }

        if self.strict {
            for key in input.keys() {
                if !self.fields.iter().any(|f| &f.name == key) {
                    errors.push(FieldError::field(codes::UNKNOWN_FIELD, key, "Unknown field."));
                }
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }

    fn represent(&self, record: &Record) -> Result<Value, SchemaError> {
        let mut out = record.clone();
        for field in self.fields.iter().filter(|f| f.write_only) {
            out.remove(&field.name);
        }
        Ok(Value::Object(out))
    }
}
