//! Configuration - server address, batch endpoint settings and the error
//! code table used by form translation.
//!
//! Settings load from YAML and are then overridden by environment variables:
//!
//! | Variable | Setting |
//! |---|---|
//! | `RESTKIT_HOST` | `server.host` |
//! | `RESTKIT_PORT` | `server.port` |
//! | `RESTKIT_BATCH_CREATE_METHOD` | `batch.create_method` |
//! | `RESTKIT_BATCH_ALLOW_EMPTY` | `batch.allow_empty_items` |
//!
//! ```
//! use restkit::batch::CreateMethod;
//! use restkit::config::Settings;
//!
//! let settings = Settings::from_yaml_str("batch:\n  create_method: get_or_create\n").unwrap();
//! assert_eq!(settings.batch.create_method, CreateMethod::GetOrCreate);
//! assert_eq!(settings.server.port, 8000);
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::batch::BatchSettings;
use crate::forms::ErrorCodes;

/// Configuration defects. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid batch create method {0:?}, expected \"create\" or \"get_or_create\"")]
    InvalidCreateMethod(String),
    #[error("cannot read config file: {0}")]
    Io(String),
    #[error("cannot parse config: {0}")]
    Parse(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    /// `host:port`, ready for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub batch: BatchSettings,
    pub error_codes: ErrorCodes,
}

impl Settings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file, then apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration file");
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let mut settings = Self::from_yaml_str(&raw)?;
        settings.apply_env()?;
        Ok(settings)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.apply_env()?;
        Ok(settings)
    }

    /// Override settings from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// Override settings from `lookup`, which maps variable names to values.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("applying environment overrides");

        if let Some(host) = lookup("RESTKIT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RESTKIT_PORT") {
            self.server.port = port.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "RESTKIT_PORT".to_string(),
                message: format!("{}", e),
            })?;
        }
        if let Some(method) = lookup("RESTKIT_BATCH_CREATE_METHOD") {
            self.batch.create_method = method.trim().parse()?;
        }
        if let Some(allow) = lookup("RESTKIT_BATCH_ALLOW_EMPTY") {
            self.batch.allow_empty_items = parse_flag("RESTKIT_BATCH_ALLOW_EMPTY", &allow)?;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {:?}", other),
        }),
    }
}
