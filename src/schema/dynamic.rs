//! Dynamic field selection on representations.
//!
//! Clients pick the fields they want back with `fields=a,b` and drop fields
//! with `omit=c`.

use std::collections::BTreeSet;

use serde_json::Value;

use super::{Schema, SchemaError};
use crate::friendly::FieldError;
use crate::record::Record;

/// Which fields a representation keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    only: Option<BTreeSet<String>>,
    omit: BTreeSet<String>,
}

fn names(value: &Value) -> BTreeSet<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => BTreeSet::new(),
    }
}

impl FieldSelection {
    /// Keep every field.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
        self.only = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn omit<I: IntoIterator<Item = S>, S: Into<String>>(mut self, fields: I) -> Self {
        self.omit.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Read `fields` and `omit` from request parameters.
    pub fn from_params(params: &Record) -> Self {
        Self {
            only: params
                .get("fields")
                .map(names)
                .filter(|set| !set.is_empty()),
            omit: params.get("omit").map(names).unwrap_or_default(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.only.is_none() && self.omit.is_empty()
    }

    /// Trim an object value. Other values pass through untouched.
    pub fn apply(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(k, _)| self.only.as_ref().map_or(true, |only| only.contains(k)))
                    .filter(|(k, _)| !self.omit.contains(k))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// A schema whose representations are trimmed by a [`FieldSelection`].
pub struct DynamicFields<S> {
    inner: S,
    selection: FieldSelection,
}

impl<S: Schema> DynamicFields<S> {
    pub fn new(inner: S, selection: FieldSelection) -> Self {
        Self { inner, selection }
    }

    pub fn selection(&self) -> &FieldSelection {
        &self.selection
    }
}

impl<S: Schema> Schema for DynamicFields<S> {
    fn validate(&self, item: &Value, partial: bool) -> Result<Record, Vec<FieldError>> {
        self.inner.validate(item, partial)
    }

    fn represent(&self, record: &Record) -> Result<Value, SchemaError> {
        Ok(self.selection.apply(self.inner.represent(record)?))
    }
}
