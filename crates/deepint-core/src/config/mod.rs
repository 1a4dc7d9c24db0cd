//! Configuration for the SDK
//!
//! - [`ClientConfig`]: endpoint, credentials, organization, retries and headers
//! - [`Credentials`]: API token with masked `Debug`
//! - [`TimeoutConfig`]: per-request transport timeouts
//! - loaders: [`ClientConfig::from_env`] and [`ClientConfig::from_file`]

mod client_config;
mod credentials;
pub mod loader;
mod timeouts;

pub use client_config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};
pub use credentials::Credentials;
pub use timeouts::TimeoutConfig;
