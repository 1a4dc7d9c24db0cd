//! Alerts on source updates and stalls

use super::{or_current, post_update, scoped_collection};
use crate::collection::{LazyCollection, ScanMode};
use crate::entity::{Entity, EntityInfo, Scope, ScopedEntity, Snapshot, dates};
use crate::error::{DeepintError, DeepintResult};
use crate::http::{ApiContext, ApiRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::ops::Deref;

/// Minimum stall time the server accepts
pub const MIN_TIME_STALL_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Fires when a source is updated under some condition
    Update,
    /// Fires when a source has not been updated for `time_stall` seconds
    Stall,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::Update => f.write_str("update"),
            AlertType::Stall => f.write_str("stall"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subscriptions: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "type")]
    pub alert_type: Option<AlertType>,
    #[serde(default, rename = "source")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub condition: Option<Value>,
    #[serde(default)]
    pub time_stall: Option<u64>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl EntityInfo for AlertInfo {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Clone)]
pub struct Alert {
    id: String,
    scope: Scope,
    snapshot: Snapshot<AlertInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct AlertUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subscriptions: Option<Vec<String>>,
    pub color: Option<String>,
    pub alert_type: Option<AlertType>,
    pub source_id: Option<String>,
    pub condition: Option<Value>,
    pub time_stall: Option<u64>,
}

fn check_time_stall(time_stall: Option<u64>) -> DeepintResult<()> {
    match time_stall {
        Some(secs) if secs < MIN_TIME_STALL_SECS => Err(DeepintError::invalid_input(
            "ALERT_CREATION_VALUES",
            format!("Minimum alert time stall is {} seconds.", MIN_TIME_STALL_SECS),
        )),
        _ => Ok(()),
    }
}

impl Alert {
    pub async fn update(&self, update: AlertUpdate) -> DeepintResult<()> {
        check_time_stall(update.time_stall)?;

        self.ensure_loaded().await?;
        let current = self.info();
        let next = AlertInfo {
            name: or_current(update.name, &current.name),
            description: or_current(update.description, &current.description),
            subscriptions: or_current(update.subscriptions, &current.subscriptions),
            color: or_current(update.color, &current.color),
            alert_type: or_current(update.alert_type, &current.alert_type),
            source_id: or_current(update.source_id, &current.source_id),
            condition: or_current(update.condition, &current.condition),
            time_stall: or_current(update.time_stall, &current.time_stall),
            ..current
        };

        post_update(
            self,
            json!({
                "name": next.name,
                "description": next.description,
                "subscriptions": next.subscriptions.clone().unwrap_or_default(),
                "color": next.color,
                "type": next.alert_type,
                "source": next.source_id,
                "condition": next.condition,
                "time_stall": next.time_stall,
            }),
        )
        .await?;

        self.snapshot.replace(next);
        Ok(())
    }
}

impl Entity for Alert {
    type Info = AlertInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    fn path(&self) -> String {
        self.scope.path(&format!("{}/{}", Self::SEGMENT, self.id))
    }

    fn snapshot(&self) -> &Snapshot<AlertInfo> {
        &self.snapshot
    }
}

impl ScopedEntity for Alert {
    const SEGMENT: &'static str = "alerts";

    fn from_parts(scope: Scope, id: String, snapshot: Snapshot<AlertInfo>) -> Self {
        Self {
            id,
            scope,
            snapshot,
        }
    }
}

crate::impl_entity_identity!(Alert);

#[derive(Debug, Clone, Serialize)]
pub struct AlertParams {
    pub name: String,
    pub description: String,
    /// Subscribed e-mail addresses
    pub subscriptions: Vec<String>,
    pub color: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(rename = "source")]
    pub source_id: String,
    pub condition: Option<Value>,
    /// Seconds without updates before a stall alert fires; at least 60
    pub time_stall: Option<u64>,
}

impl AlertParams {
    pub fn new(name: impl Into<String>, alert_type: AlertType, source_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            subscriptions: Vec::new(),
            color: "#FF0000".to_string(),
            alert_type,
            source_id: source_id.into(),
            condition: None,
            time_stall: None,
        }
    }
}

/// Alerts of one workspace
pub struct WorkspaceAlerts {
    scope: Scope,
    collection: LazyCollection<Alert>,
}

impl WorkspaceAlerts {
    pub(crate) fn new(scope: Scope, mode: ScanMode) -> Self {
        Self {
            collection: scoped_collection(&scope, "alerts", mode),
            scope,
        }
    }

    /// Create an alert; a `time_stall` under 60 s is rejected before any request
    pub async fn create(&self, params: AlertParams) -> DeepintResult<Alert> {
        check_time_stall(params.time_stall)?;

        let request = ApiRequest::post(self.scope.path("alerts"))
            .with_parameters(serde_json::to_value(&params)?);
        self.collection.create(request, "alert_id").await
    }
}

impl Deref for WorkspaceAlerts {
    type Target = LazyCollection<Alert>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::test_support::FakeTransport;

    fn alerts(transport: &std::sync::Arc<FakeTransport>) -> WorkspaceAlerts {
        WorkspaceAlerts::new(Scope::new(transport.context(), "ws"), ScanMode::Memoize)
    }

    #[tokio::test]
    async fn short_time_stall_is_rejected_locally() {
        let transport = FakeTransport::new(10);
        let mut params = AlertParams::new("quiet", AlertType::Stall, "s1");
        params.time_stall = Some(59);

        let err = alerts(&transport).create(params).await.unwrap_err();
        assert!(matches!(
            err,
            DeepintError::InvalidInput { ref code, .. } if code == "ALERT_CREATION_VALUES"
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn create_sends_type_and_source() {
        let transport = FakeTransport::new(10);
        transport.respond(Method::Post, "workspace/ws/alerts", json!({"alert_id": "a1"}));
        transport.respond(
            Method::Get,
            "workspace/ws/alerts/a1",
            json!({"name": "quiet", "type": "stall", "time_stall": 60}),
        );
        let mut params = AlertParams::new("quiet", AlertType::Stall, "s1");
        params.time_stall = Some(60);

        let alert = alerts(&transport).create(params).await.unwrap();
        assert_eq!(alert.info().alert_type, Some(AlertType::Stall));

        let post = &transport.requests()[0];
        assert_eq!(post.parameter("type"), Some(&json!("stall")));
        assert_eq!(post.parameter("source"), Some(&json!("s1")));
    }
}
