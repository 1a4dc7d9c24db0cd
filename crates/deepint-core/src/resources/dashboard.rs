//! Dashboards

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
pub struct DashboardInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
    #[serde(default, rename = "shareOpt")]
    pub share_opt: Option<String>,
    #[serde(default, rename = "gaId")]
    pub ga_id: Option<String>,
    #[serde(default)]
    pub restricted: Option<bool>,
    #[serde(default)]
    pub configuration: Option<Value>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_access: Option<DateTime<Utc>>,
}

impl EntityInfo for DashboardInfo {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Clone)]
pub struct Dashboard {
    id: String,
    scope: Scope,
    snapshot: Snapshot<DashboardInfo>,
}

/// Fields to change; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct DashboardUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy: Option<String>,
    pub share_opt: Option<String>,
    pub ga_id: Option<String>,
    pub restricted: Option<bool>,
    pub configuration: Option<Value>,
}

impl Dashboard {
    pub async fn update(&self, update: DashboardUpdate) -> DeepintResult<()> {
        self.ensure_loaded().await?;
        let current = self.info();
        let next = DashboardInfo {
            name: or_current(update.name, &current.name),
            description: or_current(update.description, &current.description),
            privacy: or_current(update.privacy, &current.privacy),
            share_opt: or_current(update.share_opt, &current.share_opt),
            ga_id: or_current(update.ga_id, &current.ga_id),
            restricted: or_current(update.restricted, &current.restricted),
            configuration: or_current(update.configuration, &current.configuration),
            ..current
        };

        post_update(
            self,
            json!({
                "name": next.name,
                "description": next.description,
                "privacy": next.privacy,
                "shareOpt": next.share_opt,
                "gaId": next.ga_id,
                "restricted": next.restricted,
                "configuration": next.configuration.clone().unwrap_or_else(|| json!({})),
            }),
        )
        .await?;

        self.snapshot.replace(next);
        Ok(())
    }
}

impl Entity for Dashboard {
    type Info = DashboardInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    fn path(&self) -> String {
        self.scope.path(&format!("{}/{}", Self::SEGMENT, self.id))
    }

    fn snapshot(&self) -> &Snapshot<DashboardInfo> {
        &self.snapshot
    }
}

impl ScopedEntity for Dashboard {
    const SEGMENT: &'static str = "dashboard";

    fn from_parts(scope: Scope, id: String, snapshot: Snapshot<DashboardInfo>) -> Self {
        Self {
            id,
            scope,
            snapshot,
        }
    }
}

crate::impl_entity_identity!(Dashboard);

/// Parameters for a new dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardParams {
    pub name: String,
    pub description: String,
    pub privacy: String,
    #[serde(rename = "shareOpt")]
    pub share_opt: String,
    pub restricted: bool,
    #[serde(rename = "gaId")]
    pub ga_id: Option<String>,
    pub configuration: Value,
}

impl DashboardParams {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            privacy: "public".to_string(),
            share_opt: String::new(),
            restricted: false,
            ga_id: None,
            configuration: json!({}),
        }
    }
}

/// Dashboards of one workspace
pub struct WorkspaceDashboards {
    scope: Scope,
    collection: LazyCollection<Dashboard>,
}

impl WorkspaceDashboards {
    pub(crate) fn new(scope: Scope, mode: ScanMode) -> Self {
        Self {
            collection: scoped_collection(&scope, "dashboards", mode),
            scope,
        }
    }

    pub async fn create(&self, params: DashboardParams) -> DeepintResult<Dashboard> {
        let request = ApiRequest::post(self.scope.path("dashboards"))
            .with_parameters(serde_json::to_value(&params)?);
        self.collection.create(request, "dashboard_id").await
    }
}

impl Deref for WorkspaceDashboards {
    type Target = LazyCollection<Dashboard>;

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

    #[tokio::test]
    async fn update_keeps_unset_fields() {
        let transport = FakeTransport::new(10);
        let path = "workspace/ws/dashboard/d1";
        transport.respond(Method::Post, path, Value::Null);
        let dashboard: Dashboard = Scope::new(transport.context(), "ws").build("d1");
        dashboard.snapshot().replace(DashboardInfo {
            name: Some("sales".into()),
            description: Some("weekly".into()),
            share_opt: Some("menu".into()),
            ..Default::default()
        });

        dashboard
            .update(DashboardUpdate {
                name: Some("revenue".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.parameter("description"), Some(&json!("weekly")));
        assert_eq!(sent.parameter("shareOpt"), Some(&json!("menu")));
        assert_eq!(dashboard.name().as_deref(), Some("revenue"));
    }

    #[tokio::test]
    async fn update_on_handle_built_by_id_loads_first() {
        let transport = FakeTransport::new(10);
        let path = "workspace/ws/dashboard/d1";
        transport.respond(
            Method::Get,
            path,
            json!({"name": "sales", "description": "weekly"}),
        );
        transport.respond(Method::Post, path, Value::Null);
        let dashboard: Dashboard = Scope::new(transport.context(), "ws").build("d1");
        assert!(!dashboard.snapshot().is_loaded());

        dashboard
            .update(DashboardUpdate {
                name: Some("revenue".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.parameter("name"), Some(&json!("revenue")));
        assert_eq!(sent.parameter("description"), Some(&json!("weekly")));
        assert_eq!(transport.count(Method::Get, path), 1);
    }

    #[tokio::test]
    async fn create_uses_wire_names() {
        let transport = FakeTransport::new(10);
        transport.respond(
            Method::Post,
            "workspace/ws/dashboards",
            json!({"dashboard_id": "d9"}),
        );
        transport.respond(Method::Get, "workspace/ws/dashboard/d9", json!({"name": "kpis"}));
        let dashboards =
            WorkspaceDashboards::new(Scope::new(transport.context(), "ws"), ScanMode::Memoize);

        let mut params = DashboardParams::new("kpis", "");
        params.ga_id = Some("G-1".into());
        let created = dashboards.create(params).await.unwrap();

        assert_eq!(created.id(), "d9");
        let post = &transport.requests()[0];
        assert_eq!(post.parameter("gaId"), Some(&json!("G-1")));
        assert!(post.parameter("shareOpt").is_some());
    }
}
