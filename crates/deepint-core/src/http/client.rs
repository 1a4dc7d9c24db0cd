//! reqwest-backed [`Transport`]

use super::error_utils::error_from_status;
use super::request::{ApiRequest, Method};
use super::retry::RetryPolicy;
use super::transport::Transport;
use crate::config::{ClientConfig, Credentials};
use crate::error::{DeepintError, DeepintResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument};
use url::Url;

/// Header carrying the API token
pub const AUTH_HEADER: &str = "x-auth-token";

/// HTTP transport talking to the real API
#[derive(Clone)]
pub struct HttpTransport {
    http_client: Client,
    base_url: Url,
    credentials: Credentials,
    headers: HashMap<String, String>,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Build a transport from a validated configuration
    pub fn new(config: &ClientConfig) -> DeepintResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .connect_timeout(config.timeouts.connect_timeout())
            .timeout(config.timeouts.request_timeout())
            .build()
            .map_err(|e| DeepintError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url()?,
            credentials: config.credentials.clone(),
            headers: config.headers.clone(),
            retry: RetryPolicy::new(config.max_retries),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the base URL
    pub fn url_for(&self, path: &str) -> DeepintResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send_once(&self, request: &ApiRequest, url: &Url) -> DeepintResult<Value> {
        let mut builder = match request.method {
            Method::Get => self.http_client.get(url.clone()),
            Method::Post => self.http_client.post(url.clone()),
            Method::Put => self.http_client.put(url.clone()),
            Method::Delete => self.http_client.delete(url.clone()),
        };

        builder = builder
            .header(AUTH_HEADER, self.credentials.token())
            .header("accept", "application/json");
        for (key, value) in self.headers.iter().chain(request.headers.iter()) {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if request.method.uses_query() {
            let pairs = request.query_pairs();
            if !pairs.is_empty() {
                builder = builder.query(&pairs);
            }
        } else if let Some(body) = &request.parameters {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(DeepintError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(DeepintError::from)?;

        debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            bytes = text.len(),
            "api response"
        );

        if !status.is_success() {
            return Err(error_from_status(
                status.as_u16(),
                request.method.as_str(),
                url.as_str(),
                &text,
            ));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            DeepintError::json(format!("Invalid JSON response: {}", e))
                .with_context(format!("{} {}", request.method, url))
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> DeepintResult<Value> {
        let url = self.url_for(&request.path)?;
        self.retry
            .execute(request.method, || self.send_once(&request, &url))
            .await
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        let config = ClientConfig::new(Credentials::new("token-abcdefghijkl"), "org-1")
            .with_base_url(base);
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn joins_paths_under_the_api_prefix() {
        let transport = transport("https://app.deepint.net/api/v1/");
        assert_eq!(
            transport.url_for("workspace/ws1/sources").unwrap().as_str(),
            "https://app.deepint.net/api/v1/workspace/ws1/sources"
        );
        assert_eq!(
            transport.url_for("/workspaces/").unwrap().as_str(),
            "https://app.deepint.net/api/v1/workspaces/"
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ClientConfig::new(Credentials::new(""), "org-1");
        assert!(HttpTransport::new(&config).is_err());
    }

    #[test]
    fn debug_does_not_leak_the_token() {
        let rendered = format!("{:?}", transport("https://app.deepint.net/api/v1/"));
        assert!(!rendered.contains("token-abcdefghijkl"));
    }
}
