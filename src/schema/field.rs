//! Field declarations and per-value coercion.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::dates;
use crate::friendly::{codes, FieldError};
use crate::validators::ValidationError;

/// Custom check run on a coerced, non-null value.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), ValidationError> + Send + Sync>;

/// The type a field's value is coerced to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Integer,
    Float,
    String,
    Boolean,
    /// `YYYY-MM-DD`, kept as a string.
    Date,
    /// An array, or a string of items separated by `delimiter`.
    List {
        delimiter: String,
        item: Box<FieldKind>,
    },
    /// Any JSON value.
    Json,
}

impl FieldKind {
    /// Coerce a non-null value, returning the invalid-value message on failure.
    pub(crate) fn coerce(&self, value: &Value) -> Result<Value, &'static str> {
        match self {
            FieldKind::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
                Value::Number(n) => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Value::from(f as i64)),
                    _ => Err("A valid integer is required."),
                },
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| "A valid integer is required."),
                _ => Err("A valid integer is required."),
            },
            FieldKind::Float => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or("A valid number is required."),
                _ => Err("A valid number is required."),
            },
            FieldKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                _ => Err("Not a valid string."),
            },
            FieldKind::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
                Value::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
                Value::String(s) => match s.trim().to_lowercase().as_str() {
                    "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                    "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                    _ => Err("Must be a valid boolean."),
                },
                _ => Err("Must be a valid boolean."),
            },
            FieldKind::Date => match value {
                Value::String(s) => dates::parse_date(s)
                    .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                    .map_err(|_| "Date has wrong format. Use YYYY-MM-DD."),
                _ => Err("Date has wrong format. Use YYYY-MM-DD."),
            },
            FieldKind::List { delimiter, item } => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|v| item.coerce(v).map_err(|_| "Invalid list."))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                Value::String(s) if s.is_empty() => Ok(Value::Array(Vec::new())),
                Value::String(s) => s
                    .split(delimiter.as_str())
                    .map(|part| {
                        item.coerce(&Value::String(part.to_string()))
                            .map_err(|_| "Invalid list.")
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                _ => Err("Invalid list."),
            },
            FieldKind::Json => Ok(value.clone()),
        }
    }
}

/// One declared field of a [`RecordSchema`](super::RecordSchema).
#[derive(Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) nullable: bool,
    pub(crate) allow_blank: bool,
    pub(crate) read_only: bool,
    pub(crate) write_only: bool,
    pub(crate) default: Option<Value>,
    pub(crate) max_length: Option<usize>,
    pub(crate) min_value: Option<f64>,
    pub(crate) max_value: Option<f64>,
    pub(crate) choices: Option<Vec<Value>>,
    pub(crate) validators: Vec<Validator>,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("read_only", &self.read_only)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl Field {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            nullable: false,
            allow_blank: false,
            read_only: false,
            write_only: false,
            default: None,
            max_length: None,
            min_value: None,
            max_value: None,
            choices: None,
            validators: Vec::new(),
        }
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: &str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn json(name: &str) -> Self {
        Self::new(name, FieldKind::Json)
    }

    /// A list field whose items have kind `item`.
    pub fn list(name: &str, item: FieldKind, delimiter: &str) -> Self {
        Self::new(
            name,
            FieldKind::List {
                delimiter: delimiter.to_string(),
                item: Box::new(item),
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    /// Output only. Values sent by clients are dropped.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Input only. Never part of a representation.
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(check));
        self
    }

    /// Validate a present value. Returns the normalized value.
    pub(crate) fn clean(&self, value: &Value) -> Result<Value, FieldError> {
        let name = self.name.as_str();

        if value.is_null() {
            return if self.nullable {
                Ok(Value::Null)
            } else {
                Err(FieldError::field(codes::NULL, name, "This field may not be null."))
            };
        }

        let cleaned = self
            .kind
            .coerce(value)
            .map_err(|message| FieldError::field(codes::INVALID, name, message))?;

        if let Value::String(s) = &cleaned {
            if s.trim().is_empty() && !self.allow_blank {
                return Err(FieldError::field(codes::BLANK, name, "This field may not be blank."));
            }
            if let Some(max) = self.max_length {
                if s.chars().count() > max {
                    return Err(FieldError::field(
                        codes::MAX_LENGTH,
                        name,
                        format!("Ensure this field has no more than {} characters.", max),
                    ));
                }
            }
        }

        if let Some(n) = cleaned.as_f64() {
            if let Some(min) = self.min_value.filter(|min| n < *min) {
                return Err(FieldError::field(
                    codes::MIN_VALUE,
                    name,
                    format!("Ensure this value is greater than or equal to {}.", min),
                ));
            }
            if let Some(max) = self.max_value.filter(|max| n > *max) {
                return Err(FieldError::field(
                    codes::MAX_VALUE,
                    name,
                    format!("Ensure this value is less than or equal to {}.", max),
                ));
            }
        }

        if let Some(choices) = &self.choices {
            if !choices.contains(&cleaned) {
                let shown = cleaned
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| cleaned.to_string());
                return Err(FieldError::field(
                    codes::INVALID_CHOICE,
                    name,
                    format!("\"{}\" is not a valid choice.", shown),
                ));
            }
        }

        for check in &self.validators {
            check(&cleaned).map_err(|e| FieldError::field(e.code, name, e.message))?;
        }

        Ok(cleaned)
    }
}
