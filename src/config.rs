//! Client configuration.
//!
//! Built with `with_*` setters or read from `CRAFTY_*` environment
//! variables, then checked with [`ClientConfig::validate`] before use.

use std::time::Duration;

use crate::error::ConfigError;

/// Agent service address used when `CRAFTY_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:7777";

/// Connect timeout used when `CRAFTY_CONNECT_TIMEOUT_SECS` is unset.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Session list cache lifetime used when `CRAFTY_CACHE_TTL_SECS` is unset.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Longest accepted connect timeout.
pub const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Longest accepted session list cache lifetime.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Settings for [`AgentRunClient`](crate::client::AgentRunClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service root, without a trailing slash
    pub base_url: String,
    /// Bearer token sent on every request
    pub api_key: Option<String>,
    /// User id sent with runs and memory lookups when the caller gives none
    pub user_id: Option<String>,
    pub connect_timeout: Duration,
    /// Zero disables the session list cache
    pub cache_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            user_id: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service root. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Read configuration from `CRAFTY_*` environment variables.
    ///
    /// Unset or empty variables keep their defaults; numbers that do not
    /// parse are an error rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = env_var("CRAFTY_API_URL") {
            config = config.with_base_url(url);
        }
        if let Some(key) = env_var("CRAFTY_API_KEY") {
            config = config.with_api_key(key);
        }
        if let Some(user_id) = env_var("CRAFTY_USER_ID") {
            config = config.with_user_id(user_id);
        }
        if let Some(secs) = env_secs("CRAFTY_CONNECT_TIMEOUT_SECS")? {
            config = config.with_connect_timeout(secs);
        }
        if let Some(secs) = env_secs("CRAFTY_CACHE_TTL_SECS")? {
            config = config.with_cache_ttl(secs);
        }

        Ok(config)
    }

    /// Check the settings can produce a working client.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_scheme =
            self.base_url.starts_with("http://") || self.base_url.starts_with("https://");
        let has_host = self
            .base_url
            .split_once("://")
            .map(|(_, rest)| !rest.is_empty())
            .unwrap_or(false);
        if !has_scheme || !has_host {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
            });
        }
        if self.connect_timeout.is_zero() || self.connect_timeout > MAX_CONNECT_TIMEOUT {
            return Err(ConfigError::InvalidValue {
                name: "connect_timeout".to_string(),
                value: format!("{}s", self.connect_timeout.as_secs()),
            });
        }
        if self.cache_ttl > MAX_CACHE_TTL {
            return Err(ConfigError::InvalidValue {
                name: "cache_ttl".to_string(),
                value: format!("{}s", self.cache_ttl.as_secs()),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_secs(name: &str) -> Result<Option<Duration>, ConfigError> {
    match env_var(name) {
        None => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
            }),
    }
}
