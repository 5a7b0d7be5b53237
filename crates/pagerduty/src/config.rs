//! Datadog connection settings.
//!
//! # Environment
//!
//! - `DATADOG_API_KEY`: Datadog API key (required)
//! - `DATADOG_APP_KEY`: Datadog application key (required)
//! - `DATADOG_HOST`: API host, defaults to `https://api.datadoghq.com`

use std::time::Duration;

use thiserror::Error;

use crate::api::traits::REDACTED;

/// Environment variable for the Datadog API key.
pub const ENV_DATADOG_API_KEY: &str = "DATADOG_API_KEY";

/// Environment variable for the Datadog application key.
pub const ENV_DATADOG_APP_KEY: &str = "DATADOG_APP_KEY";

/// Environment variable for the Datadog API host.
pub const ENV_DATADOG_HOST: &str = "DATADOG_HOST";

/// Default Datadog API host (US1 site).
pub const DEFAULT_HOST: &str = "https://api.datadoghq.com";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while assembling a [`DatadogConfig`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required credential is missing or blank.
    #[error("{0} not set")]
    MissingCredential(&'static str),

    /// The API host is not an http(s) URL.
    #[error("Invalid Datadog host '{0}': expected an http:// or https:// URL")]
    InvalidHost(String),
}

/// Credentials and endpoint for the Datadog API.
#[derive(Clone)]
pub struct DatadogConfig {
    api_key: String,
    app_key: String,
    host: String,
    timeout: Duration,
}

impl DatadogConfig {
    /// Create a config for the default host.
    ///
    /// # Errors
    /// Returns error if either key is blank.
    pub fn new(
        api_key: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        let app_key = app_key.into().trim().to_string();

        if api_key.is_empty() {
            return Err(ConfigError::MissingCredential(ENV_DATADOG_API_KEY));
        }
        if app_key.is_empty() {
            return Err(ConfigError::MissingCredential(ENV_DATADOG_APP_KEY));
        }

        Ok(Self {
            api_key,
            app_key,
            host: DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a config from `DATADOG_*` environment variables.
    ///
    /// # Errors
    /// Returns error if a key is missing or `DATADOG_HOST` is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_DATADOG_API_KEY).unwrap_or_default();
        let app_key = lookup(ENV_DATADOG_APP_KEY).unwrap_or_default();
        let config = Self::new(api_key, app_key)?;

        match lookup(ENV_DATADOG_HOST) {
            Some(host) if !host.trim().is_empty() => config.with_host(host),
            _ => Ok(config),
        }
    }

    /// Point the config at another Datadog site or a test server.
    ///
    /// # Errors
    /// Returns error if `host` is not an http(s) URL.
    pub fn with_host(mut self, host: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        let trimmed = host.trim().trim_end_matches('/');

        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(ConfigError::InvalidHost(host));
        }

        self.host = trimmed.to_string();
        Ok(self)
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// API host without a trailing slash.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for DatadogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogConfig")
            .field("api_key", &REDACTED)
            .field("app_key", &REDACTED)
            .field("host", &self.host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_new_requires_keys() {
        assert_eq!(
            DatadogConfig::new("", "app").unwrap_err(),
            ConfigError::MissingCredential(ENV_DATADOG_API_KEY)
        );
        assert_eq!(
            DatadogConfig::new("api", "  ").unwrap_err(),
            ConfigError::MissingCredential(ENV_DATADOG_APP_KEY)
        );
    }

    #[test]
    fn test_defaults() {
        let config = DatadogConfig::new("api", "app").unwrap();
        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup_with_host() {
        let config = DatadogConfig::from_lookup(lookup(&[
            (ENV_DATADOG_API_KEY, "api"),
            (ENV_DATADOG_APP_KEY, "app"),
            (ENV_DATADOG_HOST, "https://api.datadoghq.eu/"),
        ]))
        .unwrap();

        assert_eq!(config.api_key(), "api");
        assert_eq!(config.app_key(), "app");
        assert_eq!(config.host(), "https://api.datadoghq.eu");
    }

    #[test]
    fn test_from_lookup_missing_app_key() {
        let result = DatadogConfig::from_lookup(lookup(&[(ENV_DATADOG_API_KEY, "api")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingCredential(ENV_DATADOG_APP_KEY)
        );
    }

    #[test]
    fn test_invalid_host() {
        let result = DatadogConfig::new("api", "app")
            .unwrap()
            .with_host("api.datadoghq.com");
        assert!(matches!(result, Err(ConfigError::InvalidHost(_))));
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = DatadogConfig::new("api-secret", "app-secret").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("api-secret"));
        assert!(!rendered.contains("app-secret"));
    }
}
