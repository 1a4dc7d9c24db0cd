//! HTTP plumbing: request shape, transport seam, reqwest client, retries and
//! pagination.

mod backoff;
mod client;
pub mod error_utils;
mod pagination;
mod request;
mod retry;
mod transport;

pub use backoff::{BackoffConfig, ExponentialBackoff};
pub use client::{AUTH_HEADER, HttpTransport};
pub use pagination::{PAGE_PARAMETER, Page, Paginator};
pub use request::{ApiRequest, Method};
pub use retry::RetryPolicy;
pub use transport::{ApiContext, ORGANIZATION_HEADER, Transport};

#[cfg(test)]
pub use transport::MockTransport;
