//! Filters - conjunctions of field lookups.

use serde_json::Value;

use crate::record::{as_number, loosely_equal, Record};

/// How a single field is compared.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Exact(Value),
    In(Vec<Value>),
    /// Case-insensitive substring match on string fields.
    IContains(String),
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    /// `true` matches missing or null fields, `false` matches present ones.
    IsNull(bool),
}

/// One field condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub lookup: Lookup,
}

impl Condition {
    pub fn matches(&self, record: &Record) -> bool {
        let value = record.get(&self.field);
        match &self.lookup {
            Lookup::Exact(expected) => value.is_some_and(|v| loosely_equal(v, expected)),
            Lookup::In(options) => {
                value.is_some_and(|v| options.iter().any(|o| loosely_equal(v, o)))
            }
            Lookup::IContains(needle) => value
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            Lookup::Gt(bound) => value.and_then(as_number).is_some_and(|n| n > *bound),
            Lookup::Gte(bound) => value.and_then(as_number).is_some_and(|n| n >= *bound),
            Lookup::Lt(bound) => value.and_then(as_number).is_some_and(|n| n < *bound),
            Lookup::Lte(bound) => value.and_then(as_number).is_some_and(|n| n <= *bound),
            Lookup::IsNull(expected) => {
                let is_null = matches!(value, None | Some(Value::Null));
                is_null == *expected
            }
        }
    }
}

/// A conjunction of conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, lookup: Lookup) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            lookup,
        });
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Lookup::Exact(value.into()))
    }

    pub fn is_in(self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.with(field, Lookup::In(values))
    }

    /// Both filters must match.
    pub fn and(mut self, other: Filter) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}
