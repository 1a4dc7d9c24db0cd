//! Organization: the root container of workspaces

use super::workspace::{Workspace, WorkspaceInfo};
use crate::collection::{LazyCollection, ScanMode};
use crate::entity::{EntityFactory, EntityInfo, record_id};
use crate::error::DeepintResult;
use crate::http::{ApiContext, ApiRequest};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

const WORKSPACES_PATH: &str = "workspaces/";

/// Builds [`Workspace`] handles for one organization
#[derive(Debug, Clone)]
pub struct OrganizationScope {
    context: ApiContext,
    scan_mode: ScanMode,
}

impl OrganizationScope {
    pub fn new(context: ApiContext, scan_mode: ScanMode) -> Self {
        Self { context, scan_mode }
    }
}

impl EntityFactory<Workspace> for OrganizationScope {
    fn build(&self, id: &str) -> Workspace {
        Workspace::unloaded(self.context.clone(), id, self.scan_mode)
    }

    fn from_record(&self, record: &Value) -> DeepintResult<Workspace> {
        let id = record_id(record, "id")?;
        let info = WorkspaceInfo::from_response(record.clone())?;
        Ok(Workspace::new(self.context.clone(), id, info, self.scan_mode))
    }
}

/// Organization the client authenticates against.
///
/// Not an entity: it has no endpoint of its own, only the workspace listing.
#[derive(Clone)]
pub struct Organization {
    scope: OrganizationScope,
    workspaces: Arc<LazyCollection<Workspace>>,
}

impl Organization {
    pub fn new(context: ApiContext) -> Self {
        Self::with_scan_mode(context, ScanMode::default())
    }

    /// Scan mode used by the workspace collection and every workspace's children
    pub fn with_scan_mode(context: ApiContext, scan_mode: ScanMode) -> Self {
        let scope = OrganizationScope::new(context.clone(), scan_mode);
        let workspaces = LazyCollection::new(
            context,
            ApiRequest::get(WORKSPACES_PATH),
            Arc::new(scope.clone()),
        )
        .with_mode(scan_mode);

        Self {
            scope,
            workspaces: Arc::new(workspaces),
        }
    }

    pub fn id(&self) -> &str {
        self.scope.context.organization_id()
    }

    pub fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scope.scan_mode
    }

    pub fn workspaces(&self) -> &LazyCollection<Workspace> {
        &self.workspaces
    }

    /// Unhydrated handle on a workspace by id
    pub fn workspace(&self, id: &str) -> Workspace {
        self.scope.build(id)
    }

    pub async fn create_workspace(&self, name: &str, description: &str) -> DeepintResult<Workspace> {
        let request = ApiRequest::post(WORKSPACES_PATH)
            .with_parameters(json!({"name": name, "description": description}));
        self.workspaces.create(request, "workspace_id").await
    }

    /// Workspace named `name`, looked up after a forced reload, or a new one
    pub async fn workspace_if_not_exists(&self, name: &str) -> DeepintResult<Workspace> {
        if let Some(existing) = self.workspaces.fetch_by_name(name, true).await? {
            return Ok(existing);
        }
        debug!(name, "workspace not found, creating");
        self.create_workspace(name, "").await
    }
}

impl std::fmt::Debug for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Organization")
            .field("id", &self.id())
            .field("scan_mode", &self.scope.scan_mode)
            .finish()
    }
}
