//! FilterSet - request-supplied filter criteria.
//!
//! A filterset turns request parameters (query string or search body) into a
//! [`Filter`]. Unknown parameters are ignored; malformed values are reported
//! as field errors.

use serde_json::Value;

use super::filter::{Filter, Lookup};
use crate::friendly::{codes, FieldError};
use crate::record::{as_number, Record};

/// Builds a [`Filter`] from request parameters.
pub trait FilterSet: Send + Sync {
    fn filter(&self, params: &Record) -> Result<Filter, Vec<FieldError>>;
}

/// The comparison a parameter binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Exact,
    /// Comma-separated values in a string, or an array.
    In,
    IContains,
    Gt,
    Gte,
    Lt,
    Lte,
    IsNull,
}

#[derive(Debug, Clone)]
struct Binding {
    param: String,
    field: String,
    kind: LookupKind,
}

/// Declarative filterset: parameter name -> (field, lookup).
///
/// ```
/// use restkit::store::{FieldFilterSet, FilterSet, LookupKind};
/// use serde_json::json;
///
/// let filters = FieldFilterSet::new()
///     .exact("sku")
///     .bind("min_price", "price", LookupKind::Gte);
///
/// let params = json!({ "min_price": "10" }).as_object().cloned().unwrap_or_default();
/// let filter = filters.filter(&params).unwrap();
/// assert_eq!(filter.conditions().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldFilterSet {
    bindings: Vec<Binding>,
}

impl FieldFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a parameter to a lookup on a field.
    pub fn bind(mut self, param: &str, field: &str, kind: LookupKind) -> Self {
        self.bindings.push(Binding {
            param: param.to_string(),
            field: field.to_string(),
            kind,
        });
        self
    }

    /// Exact match on a field of the same name.
    pub fn exact(self, field: &str) -> Self {
        self.bind(field, field, LookupKind::Exact)
    }

    fn lookup(binding: &Binding, value: &Value) -> Result<Lookup, FieldError> {
        let numeric = |value: &Value| {
            as_number(value).ok_or_else(|| {
                FieldError::field(codes::INVALID, &binding.param, "Enter a number.")
            })
        };

        Ok(match binding.kind {
            LookupKind::Exact => Lookup::Exact(value.clone()),
            LookupKind::In => match value {
                Value::Array(items) => Lookup::In(items.clone()),
                Value::String(s) => Lookup::In(
                    s.split(',')
                        .map(str::trim)
                        .filter(|part| !part.is_empty())
                        .map(|part| Value::String(part.to_string()))
                        .collect(),
                ),
                other => Lookup::In(vec![other.clone()]),
            },
            LookupKind::IContains => match value {
                Value::String(s) => Lookup::IContains(s.clone()),
                other => Lookup::IContains(other.to_string()),
            },
            LookupKind::Gt => Lookup::Gt(numeric(value)?),
            LookupKind::Gte => Lookup::Gte(numeric(value)?),
            LookupKind::Lt => Lookup::Lt(numeric(value)?),
            LookupKind::Lte => Lookup::Lte(numeric(value)?),
            LookupKind::IsNull => match value {
                Value::Bool(flag) => Lookup::IsNull(*flag),
                Value::String(s) if s.eq_ignore_ascii_case("true") || s == "1" => {
                    Lookup::IsNull(true)
                }
                Value::String(s) if s.eq_ignore_ascii_case("false") || s == "0" => {
                    Lookup::IsNull(false)
                }
                _ => {
                    return Err(FieldError::field(
                        codes::INVALID,
                        &binding.param,
                        "Enter true or false.",
                    ))
                }
            },
        })
    }
}

impl FilterSet for FieldFilterSet {
    fn filter(&self, params: &Record) -> Result<Filter, Vec<FieldError>> {
        let mut filter = Filter::all();
        let mut errors = Vec::new();

        for binding in &self.bindings {
            let Some(value) = params.get(&binding.param) else {
                continue;
            };
            // Empty parameters mean "no constraint".
            if value.is_null() || value.as_str().is_some_and(str::is_empty) {
                continue;
            }
            match Self::lookup(binding, value) {
                Ok(lookup) => filter = filter.with(binding.field.clone(), lookup),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(errors)
        }
    }
}
