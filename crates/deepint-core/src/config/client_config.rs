//! Client configuration

use super::credentials::Credentials;
use super::timeouts::TimeoutConfig;
use crate::error::{DeepintError, DeepintResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://app.deepint.net/api/v1/";

/// Default number of retries for idempotent requests
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Everything the SDK needs to talk to the API, passed in explicitly at
/// construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API endpoint base URL; must end with `/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub credentials: Credentials,

    /// Organization every request is scoped to
    pub organization_id: String,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Retries for GET requests that fail with a transport error
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Extra headers added to every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl ClientConfig {
    pub fn new(credentials: Credentials, organization_id: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            credentials,
            organization_id: organization_id.into(),
            timeouts: TimeoutConfig::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            headers: HashMap::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Parsed base URL
    pub fn base_url(&self) -> DeepintResult<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Check that the configuration can be used to build a client
    pub fn validate(&self) -> DeepintResult<()> {
        if self.credentials.is_empty() {
            return Err(DeepintError::config("API token is empty"));
        }
        if self.organization_id.trim().is_empty() {
            return Err(DeepintError::config("Organization id is empty"));
        }

        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DeepintError::config(format!(
                "Unsupported base URL scheme '{}'",
                url.scheme()
            )));
        }
        // Url::join drops the last segment unless the base ends with '/'
        if !self.base_url.ends_with('/') {
            return Err(DeepintError::config(format!(
                "Base URL '{}' must end with '/'",
                self.base_url
            )));
        }
        if self.timeouts.request_timeout_secs == 0 {
            return Err(DeepintError::config("Request timeout must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new(Credentials::new("token-123"), "org-1")
    }

    #[test]
    fn defaults_are_valid() {
        let config = config();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_token() {
        let config = ClientConfig::new(Credentials::new("  "), "org-1");
        assert!(matches!(
            config.validate(),
            Err(DeepintError::Config { .. })
        ));
    }

    #[test]
    fn rejects_base_url_without_trailing_slash() {
        let config = config().with_base_url("https://example.com/api/v1");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let config = config().with_base_url("not a url/");
        assert!(config.validate().is_err());
    }
}
