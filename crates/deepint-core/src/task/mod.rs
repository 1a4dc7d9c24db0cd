//! Asynchronous server-side jobs
//!
//! Instance ingestion, model training, exports and imports all answer with a
//! task id. A [`Task`] is polled with [`Task::resolve`] until it reaches a
//! terminal status; only then can its result be read.

mod resolver;

pub use resolver::ResolvePolicy;

use crate::entity::{Entity, EntityInfo, Scope, ScopedEntity, Snapshot, dates};
use crate::error::DeepintError;
use crate::http::ApiContext;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Status reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failed,
    #[default]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown => "unknown",
        }
    }
}

impl From<Option<String>> for TaskStatus {
    fn from(raw: Option<String>) -> Self {
        raw.and_then(|s| s.parse().ok())
            .unwrap_or(TaskStatus::Unknown)
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = DeepintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "success" => Ok(TaskStatus::Success),
            "failed" => Ok(TaskStatus::Failed),
            _ => Err(DeepintError::invalid_input(
                "INVALID_TASK_STATUS",
                format!("Unknown task status '{}'", s),
            )),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub subtask: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub result_type: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl EntityInfo for TaskInfo {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// What the last `resolve()` observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Unresolved,
    Succeeded,
    Failed,
}

#[derive(Clone)]
pub struct Task {
    id: String,
    scope: Scope,
    snapshot: Snapshot<TaskInfo>,
    resolution: Arc<Mutex<Resolution>>,
}

impl Task {
    pub fn workspace_id(&self) -> &str {
        &self.scope.workspace_id
    }

    pub fn status(&self) -> TaskStatus {
        self.snapshot.read(|info| info.status)
    }

    /// True once `resolve()` has observed success
    pub fn is_resolved(&self) -> bool {
        *self.resolution.lock() == Resolution::Succeeded
    }
}

impl Entity for Task {
    type Info = TaskInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    fn path(&self) -> String {
        self.scope.path(&format!("{}/{}", Self::SEGMENT, self.id))
    }

    fn snapshot(&self) -> &Snapshot<TaskInfo> {
        &self.snapshot
    }
}

impl ScopedEntity for Task {
    const SEGMENT: &'static str = "task";

    fn from_parts(scope: Scope, id: String, snapshot: Snapshot<TaskInfo>) -> Self {
        Self {
            id,
            scope,
            snapshot,
            resolution: Arc::new(Mutex::new(Resolution::Unresolved)),
        }
    }
}

crate::impl_entity_identity!(Task);
