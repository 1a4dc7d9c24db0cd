//! Transport timeout configuration
//!
//! These bound individual HTTP round-trips. The task resolver has its own
//! deadline (see [`crate::task::ResolvePolicy`]).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout configuration for the HTTP transport
///
/// ```
/// use deepint_core::config::TimeoutConfig;
///
/// let config = TimeoutConfig::new()
///     .with_connect_timeout_secs(10)
///     .with_request_timeout_secs(120);
/// assert_eq!(config.request_timeout().as_secs(), 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Maximum time allowed to establish a TCP connection (default 30s)
    #[serde(default = "TimeoutConfig::default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum time for the complete request/response cycle (default 60s)
    #[serde(default = "TimeoutConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl TimeoutConfig {
    const fn default_connect_timeout() -> u64 {
        30
    }

    const fn default_request_timeout() -> u64 {
        60
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Set connection timeout in seconds
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set request timeout in seconds
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Self::default_connect_timeout(),
            request_timeout_secs: Self::default_request_timeout(),
        }
    }
}
