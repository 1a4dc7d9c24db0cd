//! Deep Intelligence SDK
//!
//! High-level entry point to the Deep Intelligence REST API. A
//! [`DeepintClient`] is built from explicit configuration, the environment or a
//! configuration file, and hands out typed handles on the organization, its
//! workspaces and everything inside them.
//!
//! # Example
//!
//! ```rust,no_run
//! use deepint_sdk::{DeepintClient, Entity, ResolvePolicy};
//!
//! # async fn run() -> deepint_sdk::DeepintResult<()> {
//! let client = DeepintClient::from_env()?;
//! let workspace = client
//!     .organization()
//!     .workspace_if_not_exists("analytics")
//!     .await?;
//!
//! let source = workspace.sources().create_if_not_exists("sales").await?;
//! println!("source {} in workspace {}", source.id(), workspace.id());
//!
//! let export = workspace.export().await?;
//! export.resolve(ResolvePolicy::default()).await?;
//! println!("export ready: {}", export.fetch_result().await?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod version;

pub use client::{DeepintClient, OpenedResource};

// Re-export commonly used types from core
pub use deepint_core::{
    collection::{LazyCollection, ScanMode},
    config::{ClientConfig, Credentials, TimeoutConfig},
    custom_endpoint::CustomEndpoint,
    entity::{Entity, EntityFactory, EntityInfo},
    error::{DeepintError, DeepintResult, UnifiedError},
    http,
    links::{ParsedUrl, ResourceKind, parse_url},
    resources::*,
    task::{ResolvePolicy, Task, TaskInfo, TaskStatus},
};

pub use version::{API_VERSION, SDK_VERSION};
