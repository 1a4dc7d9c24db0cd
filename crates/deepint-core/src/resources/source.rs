//! Data sources and their features

use super::{or_current, post_update, scoped_collection};
use crate::collection::{LazyCollection, ScanMode};
use crate::entity::{Entity, EntityInfo, Scope, ScopedEntity, Snapshot, dates};
use crate::error::DeepintResult;
use crate::http::{ApiContext, ApiRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::ops::Deref;
use tracing::debug;

/// Data type of a source column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum FeatureType {
    Numeric,
    Nominal,
    Date,
    Text,
    Logic,
    #[default]
    Unknown,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Numeric => "numeric",
            FeatureType::Nominal => "nominal",
            FeatureType::Date => "date",
            FeatureType::Text => "text",
            FeatureType::Logic => "logic",
            FeatureType::Unknown => "unknown",
        }
    }
}

impl From<Option<String>> for FeatureType {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("numeric") => FeatureType::Numeric,
            Some("nominal") => FeatureType::Nominal,
            Some("date") => FeatureType::Date,
            Some("text") => FeatureType::Text,
            Some("logic") => FeatureType::Logic,
            _ => FeatureType::Unknown,
        }
    }
}

impl From<FeatureType> for String {
    fn from(feature_type: FeatureType) -> Self {
        feature_type.as_str().to_string()
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFeature {
    /// Column position, assigned by the server
    #[serde(default)]
    pub index: Option<u32>,
    pub name: String,
    #[serde(default, rename = "type")]
    pub feature_type: FeatureType,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub date_format: Option<String>,
}

impl SourceFeature {
    pub fn new(name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self {
            index: None,
            name: name.into(),
            feature_type,
            indexed: true,
            date_format: None,
        }
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = Some(date_format.into());
        self
    }

    /// Shape the create endpoint expects
    fn to_create_params(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "type": self.feature_type,
            "indexed": self.indexed,
            "date_format": self.date_format,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub source_type: Option<String>,
    #[serde(default)]
    pub instances: Option<u64>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(default)]
    pub features: Vec<SourceFeature>,
}

impl EntityInfo for SourceInfo {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Clone)]
pub struct Source {
    id: String,
    scope: Scope,
    snapshot: Snapshot<SourceInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Source {
    pub fn workspace_id(&self) -> &str {
        &self.scope.workspace_id
    }

    pub fn features(&self) -> Vec<SourceFeature> {
        self.snapshot.read(|info| info.features.clone())
    }

    pub fn feature(&self, name: &str) -> Option<SourceFeature> {
        self.snapshot
            .read(|info| info.features.iter().find(|f| f.name == name).cloned())
    }

    /// Features, loading the source first if it was built by id only
    pub async fn loaded_features(&self) -> DeepintResult<Vec<SourceFeature>> {
        self.ensure_loaded().await?;
        Ok(self.features())
    }

    pub async fn update(&self, update: SourceUpdate) -> DeepintResult<()> {
        self.ensure_loaded().await?;
        let current = self.info();
        let next = SourceInfo {
            name: or_current(update.name, &current.name),
            description: or_current(update.description, &current.description),
            ..current
        };

        post_update(
            self,
            json!({"name": next.name, "description": next.description}),
        )
        .await?;

        self.snapshot.replace(next);
        Ok(())
    }
}

impl Entity for Source {
    type Info = SourceInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    fn path(&self) -> String {
        self.scope.path(&format!("{}/{}", Self::SEGMENT, self.id))
    }

    fn snapshot(&self) -> &Snapshot<SourceInfo> {
        &self.snapshot
    }
}

impl ScopedEntity for Source {
    const SEGMENT: &'static str = "source";

    fn from_parts(scope: Scope, id: String, snapshot: Snapshot<SourceInfo>) -> Self {
        Self {
            id,
            scope,
            snapshot,
        }
    }
}

crate::impl_entity_identity!(Source);

/// Sources of one workspace
pub struct WorkspaceSources {
    scope: Scope,
    collection: LazyCollection<Source>,
}

impl WorkspaceSources {
    pub(crate) fn new(scope: Scope, mode: ScanMode) -> Self {
        Self {
            collection: scoped_collection(&scope, "sources", mode),
            scope,
        }
    }

    pub async fn create(
        &self,
        name: &str,
        description: &str,
        features: &[SourceFeature],
    ) -> DeepintResult<Source> {
        let features: Vec<_> = features.iter().map(SourceFeature::to_create_params).collect();
        let request = ApiRequest::post(self.scope.path("sources")).with_parameters(json!({
            "name": name,
            "description": description,
            "features": features,
        }));
        self.collection.create(request, "source_id").await
    }

    /// Source named `name`, looked up after a forced reload, or a new empty
    /// one when there is none
    pub async fn create_if_not_exists(&self, name: &str) -> DeepintResult<Source> {
        if let Some(existing) = self.collection.fetch_by_name(name, true).await? {
            return Ok(existing);
        }
        debug!(name, "source not found, creating");
        self.create(name, "", &[]).await
    }

    /// Delete on the server and drop it from this collection
    pub async fn delete(&self, source: &Source) -> DeepintResult<()> {
        source.delete().await?;
        self.collection.evict(source.id()).await;
        Ok(())
    }
}

impl Deref for WorkspaceSources {
    type Target = LazyCollection<Source>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityFactory;
    use crate::http::Method;
    use crate::test_support::FakeTransport;
    use serde_json::Value;
    use std::sync::Arc;

    const LIST: &str = "workspace/ws/sources";

    fn sources(transport: &Arc<FakeTransport>) -> WorkspaceSources {
        WorkspaceSources::new(Scope::new(transport.context(), "ws"), ScanMode::Memoize)
    }

    #[test]
    fn features_decode_leniently() {
        let info: SourceInfo = serde_json::from_value(json!({
            "name": "sales",
            "features": [
                {"index": 0, "name": "amount", "type": "numeric", "indexed": true},
                {"index": 1, "name": "when", "type": "DATE", "date_format": "YYYY-MM-DD"},
                {"index": 2, "name": "blob", "type": "binary"},
            ]
        }))
        .unwrap();

        let types: Vec<_> = info.features.iter().map(|f| f.feature_type).collect();
        assert_eq!(
            types,
            vec![FeatureType::Numeric, FeatureType::Date, FeatureType::Unknown]
        );
    }

    #[tokio::test]
    async fn update_preserves_description() {
        let transport = FakeTransport::new(10);
        transport.respond(Method::Post, "workspace/ws/source/s1", Value::Null);
        let source: Source = Scope::new(transport.context(), "ws").build("s1");
        source.snapshot().replace(SourceInfo {
            name: Some("old".into()),
            description: Some("kept".into()),
            ..Default::default()
        });

        source
            .update(SourceUpdate {
                name: Some("X".into()),
                description: None,
            })
            .await
            .unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(
            sent.parameters,
            Some(json!({"name": "X", "description": "kept"}))
        );
        assert_eq!(source.info().description.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn create_if_not_exists_returns_existing() {
        let transport = FakeTransport::new(10);
        transport.list(LIST, vec![json!({"id": "s1", "name": "sales"})]);

        let found = sources(&transport).create_if_not_exists("sales").await.unwrap();
        assert_eq!(found.id(), "s1");
        assert_eq!(transport.count(Method::Post, LIST), 0);
    }

    #[tokio::test]
    async fn create_if_not_exists_creates_empty_source() {
        let transport = FakeTransport::new(10);
        transport.list(LIST, vec![]);
        transport.respond(Method::Post, LIST, json!({"source_id": "s2"}));
        transport.respond(Method::Get, "workspace/ws/source/s2", json!({"name": "new"}));

        let sources = sources(&transport);
        let created = sources.create_if_not_exists("new").await.unwrap();
        assert_eq!(created.id(), "s2");

        let post = transport
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Post)
            .unwrap();
        assert_eq!(post.parameter("features"), Some(&json!([])));
        assert_eq!(sources.fetch_by_name("new", false).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn delete_evicts_from_the_cache() {
        let transport = FakeTransport::new(10);
        transport.list(LIST, vec![json!({"id": "s1", "name": "a"}), json!({"id": "s2", "name": "b"})]);
        transport.respond(Method::Delete, "workspace/ws/source/s1", Value::Null);
        let sources = sources(&transport);

        let first = sources.fetch_by_id("s1", false).await.unwrap().unwrap();
        sources.delete(&first).await.unwrap();

        let remaining = sources.fetch_all(false).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), "s2");
    }

    #[tokio::test]
    async fn plain_entity_delete_leaves_the_cache_stale() {
        let transport = FakeTransport::new(10);
        transport.list(LIST, vec![json!({"id": "s1", "name": "a"})]);
        transport.respond(Method::Delete, "workspace/ws/source/s1", Value::Null);
        let sources = sources(&transport);

        let first = sources.fetch_by_id("s1", false).await.unwrap().unwrap();
        first.delete().await.unwrap();

        assert!(sources.fetch_by_id("s1", false).await.unwrap().is_some());
    }

    #[test]
    fn create_params_use_wire_names() {
        let feature = SourceFeature::new("when", FeatureType::Date).with_date_format("YYYY");
        assert_eq!(
            feature.to_create_params(),
            json!({"name": "when", "type": "date", "indexed": true, "date_format": "YYYY"})
        );
    }
}
