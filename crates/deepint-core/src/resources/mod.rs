//! Typed handles on the platform's resources
//!
//! [`Organization`] owns the workspace collection; every [`Workspace`] owns one
//! [`LazyCollection`](crate::collection::LazyCollection) per child type.

mod alert;
mod dashboard;
mod model;
mod organization;
mod source;
mod visualization;
mod workspace;

pub use alert::{Alert, AlertInfo, AlertParams, AlertType, AlertUpdate, WorkspaceAlerts};
pub use dashboard::{
    Dashboard, DashboardInfo, DashboardParams, DashboardUpdate, WorkspaceDashboards,
};
pub use model::{
    Model, ModelCreation, ModelInfo, ModelMethod, ModelParams, ModelType, ModelUpdate,
    WorkspaceModels,
};
pub use organization::{Organization, OrganizationScope};
pub use source::{
    FeatureType, Source, SourceFeature, SourceInfo, SourceUpdate, WorkspaceSources,
};
pub use visualization::{
    Visualization, VisualizationInfo, VisualizationParams, VisualizationUpdate,
    WorkspaceVisualizations,
};
pub use workspace::{Workspace, WorkspaceInfo, WorkspaceTasks, WorkspaceUpdate};

use crate::collection::{LazyCollection, ScanMode};
use crate::entity::{Entity, Scope, ScopedEntity};
use crate::error::{DeepintResult, ResultExt};
use crate::http::ApiRequest;
use serde_json::Value;
use std::sync::Arc;

/// Collection of one entity type under `workspace/{ws}/{list_suffix}`
pub(crate) fn scoped_collection<E: ScopedEntity>(
    scope: &Scope,
    list_suffix: &str,
    mode: ScanMode,
) -> LazyCollection<E> {
    LazyCollection::new(
        scope.context.clone(),
        ApiRequest::get(scope.path(list_suffix)),
        Arc::new(scope.clone()),
    )
    .with_mode(mode)
}

/// POST the full object to the entity's own path
pub(crate) async fn post_update<E: Entity>(entity: &E, body: Value) -> DeepintResult<()> {
    entity
        .context()
        .send(ApiRequest::post(entity.path()).with_parameters(body))
        .await
        .with_context(|| format!("Updating '{}'", entity.path()))?;
    Ok(())
}

/// Use the new value when given, the snapshot value otherwise
pub(crate) fn or_current<T: Clone>(new: Option<T>, current: &Option<T>) -> Option<T> {
    new.or_else(|| current.clone())
}
