//! Workspaces: an entity in the organization and the container of everything
//! else

use super::alert::WorkspaceAlerts;
use super::dashboard::WorkspaceDashboards;
use super::model::WorkspaceModels;
use super::source::WorkspaceSources;
use super::visualization::WorkspaceVisualizations;
use super::{or_current, post_update, scoped_collection};
use crate::collection::{LazyCollection, ScanMode};
use crate::entity::{Entity, EntityFactory, EntityInfo, Scope, Snapshot, dates, record_id};
use crate::error::{DeepintResult, ResultExt};
use crate::http::{ApiContext, ApiRequest};
use crate::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sources_count: Option<u64>,
    #[serde(default)]
    pub dashboards_count: Option<u64>,
    #[serde(default)]
    pub visualizations_count: Option<u64>,
    #[serde(default)]
    pub models_count: Option<u64>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl EntityInfo for WorkspaceInfo {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Tasks of one workspace
pub struct WorkspaceTasks {
    collection: LazyCollection<Task>,
}

impl WorkspaceTasks {
    fn new(scope: &Scope, mode: ScanMode) -> Self {
        Self {
            collection: scoped_collection(scope, "tasks", mode),
        }
    }

    /// Tasks whose snapshot is in `status`
    pub async fn fetch_by_status(
        &self,
        status: TaskStatus,
        force_reload: bool,
    ) -> DeepintResult<Vec<Task>> {
        let tasks = self.collection.fetch_all(force_reload).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.status() == status)
            .collect())
    }
}

impl Deref for WorkspaceTasks {
    type Target = LazyCollection<Task>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

struct Children {
    sources: WorkspaceSources,
    tasks: WorkspaceTasks,
    models: WorkspaceModels,
    alerts: WorkspaceAlerts,
    dashboards: WorkspaceDashboards,
    visualizations: WorkspaceVisualizations,
}

/// A workspace and its child collections.
///
/// Clones share snapshot and collections.
#[derive(Clone)]
pub struct Workspace {
    id: String,
    scope: Scope,
    snapshot: Snapshot<WorkspaceInfo>,
    children: Arc<Children>,
}

impl Workspace {
    pub fn new(
        context: ApiContext,
        id: impl Into<String>,
        info: WorkspaceInfo,
        mode: ScanMode,
    ) -> Self {
        Self::with_snapshot(context, id.into(), Snapshot::new(info), mode)
    }

    /// Handle by id only; the snapshot is fetched on first `update`
    pub(crate) fn unloaded(context: ApiContext, id: &str, mode: ScanMode) -> Self {
        Self::with_snapshot(context, id.to_string(), Snapshot::unloaded(), mode)
    }

    fn with_snapshot(
        context: ApiContext,
        id: String,
        snapshot: Snapshot<WorkspaceInfo>,
        mode: ScanMode,
    ) -> Self {
        let scope = Scope::new(context, id.clone());
        let children = Children {
            sources: WorkspaceSources::new(scope.clone(), mode),
            tasks: WorkspaceTasks::new(&scope, mode),
            models: WorkspaceModels::new(scope.clone(), mode),
            alerts: WorkspaceAlerts::new(scope.clone(), mode),
            dashboards: WorkspaceDashboards::new(scope.clone(), mode),
            visualizations: WorkspaceVisualizations::new(scope.clone(), mode),
        };

        Self {
            id,
            scope,
            snapshot,
            children: Arc::new(children),
        }
    }

    pub fn organization_id(&self) -> &str {
        self.scope.context.organization_id()
    }

    /// Scope for building child entities by id
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn sources(&self) -> &WorkspaceSources {
        &self.children.sources
    }

    pub fn tasks(&self) -> &WorkspaceTasks {
        &self.children.tasks
    }

    pub fn models(&self) -> &WorkspaceModels {
        &self.children.models
    }

    pub fn alerts(&self) -> &WorkspaceAlerts {
        &self.children.alerts
    }

    pub fn dashboards(&self) -> &WorkspaceDashboards {
        &self.children.dashboards
    }

    pub fn visualizations(&self) -> &WorkspaceVisualizations {
        &self.children.visualizations
    }

    /// Load the snapshot and restart every child listing
    pub async fn load_all(&self) -> DeepintResult<()> {
        self.load().await?;
        self.sources().load().await;
        self.tasks().load().await;
        self.models().load().await;
        self.alerts().load().await;
        self.dashboards().load().await;
        self.visualizations().load().await;
        Ok(())
    }

    pub async fn update(&self, update: WorkspaceUpdate) -> DeepintResult<()> {
        self.ensure_loaded().await?;
        let current = self.info();
        let next = WorkspaceInfo {
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

    /// Start an export of the whole workspace. The returned task is added to
    /// this workspace's task collection; resolve it to get the download link.
    pub async fn export(&self) -> DeepintResult<Task> {
        let body = self
            .scope
            .context
            .send(ApiRequest::post(self.scope.path("export")))
            .await
            .with_context(|| format!("Exporting workspace '{}'", self.id))?;

        let task: Task = self.scope.build(&record_id(&body, "task_id")?);
        self.tasks().adopt(task.clone()).await;
        Ok(task)
    }
}

impl Entity for Workspace {
    type Info = WorkspaceInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    fn path(&self) -> String {
        format!("workspace/{}", self.id)
    }

    fn snapshot(&self) -> &Snapshot<WorkspaceInfo> {
        &self.snapshot
    }
}

crate::impl_entity_identity!(Workspace);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::resources::Organization;
    use crate::test_support::FakeTransport;
    use serde_json::Value;

    fn workspace(transport: &Arc<FakeTransport>) -> Workspace {
        Workspace::new(
            transport.context(),
            "ws",
            WorkspaceInfo {
                name: Some("analytics".into()),
                description: Some("main".into()),
                ..Default::default()
            },
            ScanMode::Memoize,
        )
    }

    #[tokio::test]
    async fn update_sends_full_object_over_post() {
        let transport = FakeTransport::new(10);
        transport.respond(Method::Post, "workspace/ws", Value::Null);
        let ws = workspace(&transport);

        ws.update(WorkspaceUpdate {
            name: Some("X".into()),
            description: None,
        })
        .await
        .unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.parameters, Some(json!({"name": "X", "description": "main"})));
        assert_eq!(ws.info().name.as_deref(), Some("X"));
    }

    #[tokio::test]
    async fn update_on_handle_built_by_id_loads_first() {
        let transport = FakeTransport::new(10);
        transport.respond(Method::Get, "workspace/ws", json!({"description": "server desc"}));
        transport.respond(Method::Post, "workspace/ws", Value::Null);
        let ws = Organization::new(transport.context()).workspace("ws");

        ws.update(WorkspaceUpdate {
            name: Some("X".into()),
            description: None,
        })
        .await
        .unwrap();
        ws.update(WorkspaceUpdate {
            name: Some("Y".into()),
            description: None,
        })
        .await
        .unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.parameters, Some(json!({"name": "Y", "description": "server desc"})));
        assert_eq!(transport.count(Method::Get, "workspace/ws"), 1);
    }

    #[tokio::test]
    async fn load_replaces_the_whole_snapshot() {
        let transport = FakeTransport::new(10);
        transport.respond(
            Method::Get,
            "workspace/ws",
            json!({"id": "ws", "name": "renamed", "sources_count": 3}),
        );
        let ws = workspace(&transport);

        ws.load().await.unwrap();
        let info = ws.info();
        assert_eq!(info.name.as_deref(), Some("renamed"));
        assert_eq!(info.description, None);
        assert_eq!(info.sources_count, Some(3));
    }

    #[tokio::test]
    async fn missing_workspace_is_not_found() {
        let transport = FakeTransport::new(10);
        let ws = workspace(&transport);
        assert!(ws.load().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn export_adds_task_to_collection() {
        let transport = FakeTransport::new(10);
        transport.respond(Method::Post, "workspace/ws/export", json!({"task_id": "t5"}));
        transport.list("workspace/ws/tasks", vec![]);
        let ws = workspace(&transport);
        ws.tasks().load().await;

        let task = ws.export().await.unwrap();
        assert_eq!(task.path(), "workspace/ws/task/t5");
        assert_eq!(ws.tasks().fetch_by_id("t5", false).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn listed_status_reaches_an_exported_task() {
        let transport = FakeTransport::new(10);
        transport.list("workspace/ws/tasks", vec![json!({"id": "t1", "status": "running"})]);
        transport.respond(Method::Post, "workspace/ws/export", json!({"task_id": "t1"}));
        let ws = workspace(&transport);
        ws.tasks().load().await;

        let exported = ws.export().await.unwrap();
        let running = ws
            .tasks()
            .fetch_by_status(TaskStatus::Running, false)
            .await
            .unwrap();

        let ids: Vec<_> = running.iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["t1"]);
        assert_eq!(exported.status(), TaskStatus::Running);
    }

    #[tokio::test]
    async fn fetch_by_status_filters_snapshots() {
        let transport = FakeTransport::new(10);
        transport.list(
            "workspace/ws/tasks",
            vec![
                json!({"id": "t1", "status": "running"}),
                json!({"id": "t2", "status": "success"}),
                json!({"id": "t3", "status": "running"}),
            ],
        );
        let ws = workspace(&transport);

        let running = ws
            .tasks()
            .fetch_by_status(TaskStatus::Running, false)
            .await
            .unwrap();
        let ids: Vec<_> = running.iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }

    #[test]
    fn clones_share_children() {
        let transport = FakeTransport::new(10);
        let ws = workspace(&transport);
        let clone = ws.clone();
        assert!(std::ptr::eq(ws.sources(), clone.sources()));
        assert_eq!(ws, clone);
    }
}
