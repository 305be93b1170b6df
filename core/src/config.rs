//! Client configuration.
//!
//! Defaults target the public API. `from_env` layers the `NEXTDNS_*`
//! environment variables on top so binaries and tests can point the client
//! elsewhere without code changes.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.nextdns.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "NEXTDNS_API_KEY";
pub const ENV_BASE_URL: &str = "NEXTDNS_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "NEXTDNS_TIMEOUT_SECS";
pub const ENV_DEBUG: &str = "NEXTDNS_DEBUG";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Log request and response bodies at debug level.
    pub debug: bool,
}

// The API key must never show up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_API_KEY) {
            config.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ApiError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {secs:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = lookup(ENV_DEBUG) {
            config.debug = parse_flag(&flag)
                .ok_or_else(|| ApiError::config(format!("{ENV_DEBUG} must be a boolean, got {flag:?}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if matches!(self.api_key.as_deref(), Some("")) {
            return Err(ApiError::EmptyApiKey);
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::config(format!("invalid base url {}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::config(format!(
                "base url must use http or https: {}",
                self.base_url
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ApiError::config(format!("base url has no host: {}", self.base_url)));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::config(format!(
                "base url must not carry a query or fragment: {}",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
