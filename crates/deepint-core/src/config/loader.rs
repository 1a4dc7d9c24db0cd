//! Configuration loaders
//!
//! These resolve a [`ClientConfig`] once, before the SDK is used. Nothing else
//! in the crate reads the environment or the filesystem for settings.

use super::client_config::{ClientConfig, DEFAULT_BASE_URL};
use super::credentials::Credentials;
use crate::error::{DeepintError, DeepintResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const ENV_TOKEN: &str = "DEEPINT_TOKEN";
pub const ENV_ORGANIZATION: &str = "DEEPINT_ORGANIZATION";
pub const ENV_BASE_URL: &str = "DEEPINT_BASE_URL";
pub const ENV_MAX_RETRIES: &str = "DEEPINT_MAX_RETRIES";
pub const ENV_REQUEST_TIMEOUT: &str = "DEEPINT_REQUEST_TIMEOUT";

impl ClientConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> DeepintResult<Self> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with("DEEPINT_"))
            .collect();
        load_from_vars(&vars)
    }

    /// Load configuration from a TOML or JSON file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> DeepintResult<Self> {
        load_from_file(path.as_ref())
    }
}

/// Build a configuration from a set of `DEEPINT_*` variables
pub fn load_from_vars(vars: &HashMap<String, String>) -> DeepintResult<ClientConfig> {
    let token = vars
        .get(ENV_TOKEN)
        .ok_or_else(|| DeepintError::config(format!("{} is not set", ENV_TOKEN)))?;
    let organization = vars
        .get(ENV_ORGANIZATION)
        .ok_or_else(|| DeepintError::config(format!("{} is not set", ENV_ORGANIZATION)))?;

    let mut config = ClientConfig::new(Credentials::new(token.as_str()), organization.as_str());

    if let Some(base_url) = vars.get(ENV_BASE_URL) {
        config.base_url = normalize_base_url(base_url);
    }

    if let Some(retries) = vars.get(ENV_MAX_RETRIES) {
        config.max_retries = retries.parse().map_err(|_| {
            DeepintError::config(format!("Invalid {} value", ENV_MAX_RETRIES))
                .with_context(format!("Parsing '{}'", retries))
        })?;
    }

    if let Some(timeout) = vars.get(ENV_REQUEST_TIMEOUT) {
        config.timeouts.request_timeout_secs = timeout.parse().map_err(|_| {
            DeepintError::config(format!("Invalid {} value", ENV_REQUEST_TIMEOUT))
                .with_context(format!("Parsing '{}'", timeout))
        })?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
pub fn load_from_file(path: &Path) -> DeepintResult<ClientConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        DeepintError::io_with_path(
            format!("Failed to read config file: {}", e),
            path.display().to_string(),
        )
    })?;

    let mut config: ClientConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            DeepintError::config(format!("Failed to parse JSON config: {}", e))
                .with_context(format!("Deserializing '{}'", path.display()))
        })?,
        _ => toml::from_str(&content).map_err(|e| {
            DeepintError::config(format!("Failed to parse TOML config: {}", e))
                .with_context(format!("Deserializing '{}'", path.display()))
        })?,
    };

    config.base_url = normalize_base_url(&config.base_url);
    config.validate()?;
    Ok(config)
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn loads_required_variables() {
        let config = load_from_vars(&vars(&[
            (ENV_TOKEN, "secret-token"),
            (ENV_ORGANIZATION, "org-42"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.token(), "secret-token");
        assert_eq!(config.organization_id, "org-42");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = load_from_vars(&vars(&[(ENV_ORGANIZATION, "org-42")])).unwrap_err();
        assert!(matches!(err, DeepintError::Config { .. }));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = load_from_vars(&vars(&[
            (ENV_TOKEN, "secret-token"),
            (ENV_ORGANIZATION, "org-42"),
            (ENV_BASE_URL, "http://localhost:8080/api/v1"),
            (ENV_MAX_RETRIES, "0"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/api/v1/");
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn invalid_retry_count_is_rejected() {
        let err = load_from_vars(&vars(&[
            (ENV_TOKEN, "secret-token"),
            (ENV_ORGANIZATION, "org-42"),
            (ENV_MAX_RETRIES, "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, DeepintError::Config { .. }));
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
organization_id = "org-7"
max_retries = 5

[credentials]
token = "file-token"

[timeouts]
request_timeout_secs = 15
"#
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.organization_id, "org-7");
        assert_eq!(config.credentials.token(), "file-token");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeouts.request_timeout_secs, 15);
        assert_eq!(config.timeouts.connect_timeout_secs, 30);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ClientConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, DeepintError::Io { .. }));
    }
}
