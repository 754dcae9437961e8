//! Batch endpoint settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ConfigError;

/// How each PUT/POST item is turned into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateMethod {
    /// Always insert; duplicates fail the whole batch.
    #[default]
    Create,
    /// Reuse a record whose fields all match the item.
    GetOrCreate,
}

impl CreateMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreateMethod::Create => "create",
            CreateMethod::GetOrCreate => "get_or_create",
        }
    }
}

impl fmt::Display for CreateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreateMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(CreateMethod::Create),
            "get_or_create" => Ok(CreateMethod::GetOrCreate),
            other => Err(ConfigError::InvalidCreateMethod(other.to_string())),
        }
    }
}

impl Serialize for CreateMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CreateMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Settings of one batch endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub create_method: CreateMethod,
    /// Accept `{"items": []}` instead of rejecting it.
    pub allow_empty_items: bool,
}

impl BatchSettings {
    pub fn create_method(mut self, method: CreateMethod) -> Self {
        self.create_method = method;
        self
    }

    pub fn allow_empty_items(mut self, allow: bool) -> Self {
        self.allow_empty_items = allow;
        self
    }
}
