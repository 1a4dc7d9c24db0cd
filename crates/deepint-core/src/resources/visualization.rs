//! Visualizations

use super::{or_current, post_update, scoped_collection};
use crate::collection::{LazyCollection, ScanMode};
use crate::entity::{Entity, EntityInfo, Scope, ScopedEntity, Snapshot, dates};
use crate::error::DeepintResult;
use crate::http::{ApiContext, ApiRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::ops::Deref;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualizationInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
    #[serde(default, rename = "source")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub configuration: Option<Value>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_access: Option<DateTime<Utc>>,
}

impl EntityInfo for VisualizationInfo {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Clone)]
pub struct Visualization {
    id: String,
    scope: Scope,
    snapshot: Snapshot<VisualizationInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct VisualizationUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy: Option<String>,
    pub source_id: Option<String>,
    pub configuration: Option<Value>,
}

impl Visualization {
    /// Source the visualization renders, if known
    pub fn source_id(&self) -> Option<String> {
        self.snapshot.read(|info| info.source_id.clone())
    }

    pub async fn update(&self, update: VisualizationUpdate) -> DeepintResult<()> {
        self.ensure_loaded().await?;
        let current = self.info();
        let next = VisualizationInfo {
            name: or_current(update.name, &current.name),
            description: or_current(update.description, &current.description),
            privacy: or_current(update.privacy, &current.privacy),
            source_id: or_current(update.source_id, &current.source_id),
            configuration: or_current(update.configuration, &current.configuration),
            ..current
        };

        post_update(
            self,
            json!({
                "name": next.name,
                "description": next.description,
                "privacy": next.privacy,
                "source": next.source_id,
                "configuration": next.configuration.clone().unwrap_or_else(|| json!({})),
            }),
        )
        .await?;

        self.snapshot.replace(next);
        Ok(())
    }
}

impl Entity for Visualization {
    type Info = VisualizationInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    fn path(&self) -> String {
        self.scope.path(&format!("{}/{}", Self::SEGMENT, self.id))
    }

    fn snapshot(&self) -> &Snapshot<VisualizationInfo> {
        &self.snapshot
    }
}

impl ScopedEntity for Visualization {
    const SEGMENT: &'static str = "visualization";

    fn from_parts(scope: Scope, id: String, snapshot: Snapshot<VisualizationInfo>) -> Self {
        Self {
            id,
            scope,
            snapshot,
        }
    }
}

crate::impl_entity_identity!(Visualization);

#[derive(Debug, Clone, Serialize)]
pub struct VisualizationParams {
    pub name: String,
    pub description: String,
    pub privacy: String,
    #[serde(rename = "source")]
    pub source_id: String,
    pub configuration: Value,
}

impl VisualizationParams {
    pub fn new(name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            privacy: "public".to_string(),
            source_id: source_id.into(),
            configuration: json!({}),
        }
    }
}

/// Visualizations of one workspace
pub struct WorkspaceVisualizations {
    scope: Scope,
    collection: LazyCollection<Visualization>,
}

impl WorkspaceVisualizations {
    pub(crate) fn new(scope: Scope, mode: ScanMode) -> Self {
        Self {
            collection: scoped_collection(&scope, "visualizations", mode),
            scope,
        }
    }

    pub async fn create(&self, params: VisualizationParams) -> DeepintResult<Visualization> {
        let request = ApiRequest::post(self.scope.path("visualizations"))
            .with_parameters(serde_json::to_value(&params)?);
        self.collection.create(request, "visualization_id").await
    }
}

impl Deref for WorkspaceVisualizations {
    type Target = LazyCollection<Visualization>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}
