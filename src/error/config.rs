//! Configuration error types.

use thiserror::Error;

/// Problems found while loading or validating client configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// The base URL is not an http(s) URL.
    #[error("Invalid base URL '{url}': expected http:// or https://")]
    InvalidBaseUrl { url: String },

    /// An environment variable held a value of the wrong shape.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },
}

impl ConfigError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidBaseUrl { .. } => "E_CFG_URL",
            ConfigError::InvalidValue { .. } => "E_CFG_VALUE",
        }
    }
}
