use std::env;

use crate::error::ConfigError;

/// Function configuration read from the Lambda environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub bucket_name: Option<String>,
    pub handler: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            table_name: non_empty("TABLE_NAME").ok_or(ConfigError::Missing("TABLE_NAME"))?,
            bucket_name: non_empty("BUCKET_NAME"),
            // HANDLER wins over the value the provided runtime exports
            handler: non_empty("HANDLER").or_else(|| non_empty("_HANDLER")),
        })
    }

    pub fn require_bucket(&self) -> Result<&str, ConfigError> {
        self.bucket_name
            .as_deref()
            .ok_or(ConfigError::Missing("BUCKET_NAME"))
    }

    pub fn require_handler(&self) -> Result<&str, ConfigError> {
        self.handler.as_deref().ok_or(ConfigError::Missing("HANDLER"))
    }
}
