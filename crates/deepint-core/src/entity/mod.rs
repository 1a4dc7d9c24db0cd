//! Entity contract shared by every remote resource
//!
//! An entity is a handle on one server-side resource: an immutable identifier,
//! a [`Snapshot`] of server fields, and the [`ApiContext`] needed to re-issue
//! requests. Handles compare equal iff their identifiers match.

pub mod dates;
mod snapshot;

pub use snapshot::Snapshot;

use crate::error::{DeepintError, DeepintResult, ResultExt};
use crate::http::{ApiContext, ApiRequest};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Snapshot struct of one entity type.
///
/// All fields are optional; a field missing from a response becomes `None`.
pub trait EntityInfo:
    DeserializeOwned + Serialize + Default + Clone + std::fmt::Debug + Send + Sync + 'static
{
    fn name(&self) -> Option<&str>;

    /// Decode a response body, `null` being an empty snapshot
    fn from_response(body: Value) -> DeepintResult<Self> {
        if body.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(body)
            .map_err(DeepintError::from)
            .context("Decoding entity snapshot")
    }
}

/// A handle on one remote resource
#[async_trait]
pub trait Entity: Clone + Send + Sync + 'static {
    type Info: EntityInfo;

    fn id(&self) -> &str;

    fn context(&self) -> &ApiContext;

    /// Path of the single-resource endpoint
    fn path(&self) -> String;

    fn snapshot(&self) -> &Snapshot<Self::Info>;

    fn info(&self) -> Self::Info {
        self.snapshot().get()
    }

    fn name(&self) -> Option<String> {
        self.snapshot().read(|info| info.name().map(str::to_string))
    }

    /// Identifier equality OR name equality; `None` never matches
    fn matches(&self, id: Option<&str>, name: Option<&str>) -> bool {
        if id.is_some_and(|id| id == self.id()) {
            return true;
        }
        name.is_some_and(|name| self.snapshot().read(|info| info.name() == Some(name)))
    }

    /// Refresh from the server, replacing the whole snapshot
    async fn load(&self) -> DeepintResult<()> {
        let body = self
            .context()
            .send(ApiRequest::get(self.path()))
            .await
            .with_context(|| format!("Loading '{}'", self.path()))?;
        let info = Self::Info::from_response(body)?;
        self.snapshot().replace(info);
        Ok(())
    }

    /// `load()` unless the snapshot already holds server state
    async fn ensure_loaded(&self) -> DeepintResult<()> {
        if !self.snapshot().is_loaded() {
            self.load().await?;
        }
        Ok(())
    }

    /// Delete on the server. Collections holding this entity are not touched.
    async fn delete(&self) -> DeepintResult<()> {
        self.context()
            .send(ApiRequest::delete(self.path()))
            .await
            .with_context(|| format!("Deleting '{}'", self.path()))?;
        Ok(())
    }
}

/// Builds entities of one type for a collection
pub trait EntityFactory<E>: Send + Sync {
    /// Handle by identifier only, snapshot unloaded until `load()`
    fn build(&self, id: &str) -> E;

    /// Handle hydrated from a list or create record carrying an `id`
    fn from_record(&self, record: &Value) -> DeepintResult<E>;
}

/// Workspace an entity lives in, plus the context to reach it
#[derive(Debug, Clone)]
pub struct Scope {
    pub context: ApiContext,
    pub workspace_id: String,
}

impl Scope {
    pub fn new(context: ApiContext, workspace_id: impl Into<String>) -> Self {
        Self {
            context,
            workspace_id: workspace_id.into(),
        }
    }

    /// `workspace/{ws}/{suffix}`
    pub fn path(&self, suffix: &str) -> String {
        format!("workspace/{}/{}", self.workspace_id, suffix)
    }
}

/// Entities living inside a workspace
pub trait ScopedEntity: Entity {
    /// Segment of the single-resource path, e.g. `source` in `workspace/{ws}/source/{id}`
    const SEGMENT: &'static str;

    fn from_parts(scope: Scope, id: String, snapshot: Snapshot<Self::Info>) -> Self;
}

impl<E: ScopedEntity> EntityFactory<E> for Scope {
    fn build(&self, id: &str) -> E {
        E::from_parts(self.clone(), id.to_string(), Snapshot::unloaded())
    }

    fn from_record(&self, record: &Value) -> DeepintResult<E> {
        let id = record_id(record, "id")?;
        let info = E::Info::from_response(record.clone())?;
        Ok(E::from_parts(self.clone(), id, Snapshot::new(info)))
    }
}

/// Read an identifier field, accepting strings and numbers
pub fn record_id(record: &Value, key: &str) -> DeepintResult<String> {
    match record.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(DeepintError::json(format!("Response has no '{}' field", key))
            .with_context(truncate_record(record))),
    }
}

fn truncate_record(record: &Value) -> String {
    let rendered = record.to_string();
    match rendered.char_indices().nth(200) {
        Some((cut, _)) => format!("{}...", &rendered[..cut]),
        None => rendered,
    }
}

/// Identity-based `PartialEq`, `Eq`, `Hash` and a compact `Debug`
#[macro_export]
macro_rules! impl_entity_identity {
    ($entity:ty) => {
        impl PartialEq for $entity {
            fn eq(&self, other: &Self) -> bool {
                $crate::entity::Entity::id(self) == $crate::entity::Entity::id(other)
            }
        }

        impl Eq for $entity {}

        impl std::hash::Hash for $entity {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash($crate::entity::Entity::id(self), state);
            }
        }

        impl std::fmt::Debug for $entity {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($entity))
                    .field("id", &$crate::entity::Entity::id(self))
                    .field("info", $crate::entity::Entity::snapshot(self))
                    .finish()
            }
        }
    };
}
