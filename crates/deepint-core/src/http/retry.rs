//! Retry loop for idempotent requests

use super::backoff::{BackoffConfig, ExponentialBackoff};
use super::request::Method;
use crate::error::{DeepintError, DeepintResult, UnifiedError};
use std::future::Future;
use tokio::time::sleep;
use tracing::warn;

/// Retry policy applied by [`HttpTransport`](super::HttpTransport)
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: BackoffConfig,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: BackoffConfig::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Only GET is retried; mutating calls run exactly once
    pub fn retries_for(&self, method: Method) -> u32 {
        if method == Method::Get {
            self.max_retries
        } else {
            0
        }
    }

    /// Run `operation`, retrying retryable errors with exponential backoff.
    ///
    /// Non-retryable errors and the last error after all attempts are
    /// returned unchanged.
    pub async fn execute<T, F, Fut>(&self, method: Method, operation: F) -> DeepintResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = DeepintResult<T>>,
    {
        let max_retries = self.retries_for(method);
        let mut backoff = ExponentialBackoff::new(self.backoff.clone());
        let mut last_error: Option<DeepintError> = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(attempt, "request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !error.is_retryable() || attempt == max_retries {
                        return Err(error);
                    }

                    let delay = backoff.next_delay();
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "retrying after transport failure"
                    );
                    last_error = Some(error);
                    sleep(delay).await;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DeepintError::transport("Retry loop finished without a result")))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_RETRIES)
    }
}
