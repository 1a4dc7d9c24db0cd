//! Task polling

use super::{Resolution, Task, TaskStatus};
use crate::entity::Entity;
use crate::error::{DeepintError, DeepintResult, ResultExt};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

/// Spacing and deadline for [`Task::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvePolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl ResolvePolicy {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl Task {
    /// Poll until the task reaches a terminal status or the deadline passes.
    ///
    /// - `Success` returns `Ok(())` and unlocks [`Task::fetch_result`]
    /// - `Failed` returns `TaskFailed` with the server's error code and
    ///   description
    /// - a task that disappears surfaces the `NotFound` of that poll
    /// - a deadline overrun returns `Timeout`; the task keeps running on
    ///   the server
    #[instrument(skip(self, policy), fields(task_id = %self.id))]
    pub async fn resolve(&self, policy: ResolvePolicy) -> DeepintResult<()> {
        let deadline = Instant::now() + policy.timeout;
        let mut polls: u32 = 0;

        loop {
            self.load().await?;
            polls += 1;

            let info = self.info();
            debug!(polls, status = %info.status, progress = ?info.progress, "task polled");

            match info.status {
                TaskStatus::Success => {
                    *self.resolution.lock() = Resolution::Succeeded;
                    info!(polls, "task succeeded");
                    return Ok(());
                }
                TaskStatus::Failed => {
                    *self.resolution.lock() = Resolution::Failed;
                    warn!(polls, error_code = ?info.error_code, "task failed");
                    return Err(DeepintError::task_failed(
                        self.id.as_str(),
                        info.error_code.unwrap_or_default(),
                        info.error_description.unwrap_or_default(),
                    ));
                }
                TaskStatus::Pending | TaskStatus::Running | TaskStatus::Unknown => {}
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(polls, status = %info.status, "task resolution timed out");
                return Err(DeepintError::timeout(policy.timeout)
                    .with_context(format!("Task '{}' still {}", self.id, info.status)));
            }
            sleep(policy.poll_interval.min(deadline - now)).await;
        }
    }

    /// Result payload of a task that `resolve()` saw succeed.
    ///
    /// Loads once if the snapshot carries no result; a task without any
    /// result yields `Value::Null`.
    pub async fn fetch_result(&self) -> DeepintResult<Value> {
        match *self.resolution.lock() {
            Resolution::Succeeded => {}
            Resolution::Failed => {
                return Err(DeepintError::invalid_state(format!(
                    "Task '{}' failed; it has no result",
                    self.id
                )));
            }
            Resolution::Unresolved => {
                return Err(DeepintError::invalid_state(format!(
                    "Task '{}' has not been resolved",
                    self.id
                )));
            }
        }

        if let Some(result) = self.snapshot.read(|info| info.result.clone()) {
            return Ok(result);
        }

        self.load()
            .await
            .with_context(|| format!("Fetching result of task '{}'", self.id))?;
        Ok(self
            .snapshot
            .read(|info| info.result.clone())
            .unwrap_or(Value::Null))
    }
}
