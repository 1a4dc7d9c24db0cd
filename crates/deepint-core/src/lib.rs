//! Deep Intelligence Core Library
//!
//! This crate provides the core of the Deep Intelligence client: errors,
//! configuration, the HTTP transport, lazily paginated resource collections,
//! task polling and typed handles on every platform resource.
//!
//! # Example
//!
//! ```rust
//! use deepint_core::config::{ClientConfig, Credentials};
//!
//! let config = ClientConfig::new(Credentials::new("token"), "org-1");
//! assert!(config.validate().is_ok());
//! ```

pub mod collection;
pub mod config;
pub mod custom_endpoint;
pub mod entity;
pub mod error;
pub mod http;
pub mod links;
pub mod resources;
pub mod task;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use collection::{LazyCollection, ScanMode};
pub use config::{ClientConfig, Credentials, TimeoutConfig};
pub use custom_endpoint::CustomEndpoint;
pub use entity::{Entity, EntityFactory, EntityInfo, Scope, ScopedEntity, Snapshot};
pub use error::{DeepintError, DeepintResult, ResultExt, UnifiedError};
pub use http::{ApiContext, ApiRequest, HttpTransport, Method, Paginator, Transport};
pub use links::{ParsedUrl, ResourceKind, parse_url};
pub use resources::*;
pub use task::{ResolvePolicy, Task, TaskInfo, TaskStatus};
