//! From trait implementations for DeepintError conversions

use super::types::DeepintError;

impl From<std::io::Error> for DeepintError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for DeepintError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for DeepintError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Invalid configuration file: {}", error))
    }
}

impl From<url::ParseError> for DeepintError {
    fn from(error: url::ParseError) -> Self {
        Self::config(format!("Invalid URL: {}", error))
    }
}

impl From<reqwest::Error> for DeepintError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Transport {
            message: error.to_string(),
            status_code,
            url,
            context: None,
        }
    }
}
