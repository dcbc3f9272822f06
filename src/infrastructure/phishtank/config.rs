//! PhishTank client configuration

use std::time::Duration;
use thiserror::Error;

/// Public PhishTank lookup endpoint
pub const DEFAULT_ENDPOINT: &str = "https://checkurl.phishtank.com/checkurl/";

/// PhishTank asks clients to identify themselves with a `phishtank/` agent
pub const DEFAULT_USER_AGENT: &str = "phishtank/qrtrust-app";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const ENV_ENDPOINT: &str = "QRTRUST_ENDPOINT";
pub const ENV_APP_KEY: &str = "QRTRUST_APP_KEY";
pub const ENV_TIMEOUT_MS: &str = "QRTRUST_TIMEOUT_MS";

/// Errors reading the configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid QRTRUST_TIMEOUT_MS value '{0}': expected milliseconds")]
    InvalidTimeout(String),

    #[error("Endpoint must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),
}

/// Settings for the PhishTank transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhishTankConfig {
    /// Lookup endpoint (the public API or a proxy in front of it)
    pub endpoint: String,
    /// Optional application key; raises the rate limit
    pub app_key: Option<String>,
    /// User-Agent header
    pub user_agent: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for PhishTankConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl PhishTankConfig {
    /// Reads overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`; unset or blank values keep the
    /// defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config = config.with_endpoint(endpoint)?;
        }
        if let Some(key) = get(ENV_APP_KEY) {
            config = config.with_app_key(key);
        }
        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            let millis = raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            config = config.with_timeout(Duration::from_millis(millis));
        }

        Ok(config)
    }

    /// Sets the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        let lower = endpoint.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }
        self.endpoint = endpoint;
        Ok(self)
    }

    /// Sets the application key
    pub fn with_app_key(mut self, key: impl Into<String>) -> Self {
        self.app_key = Some(key.into());
        self
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
