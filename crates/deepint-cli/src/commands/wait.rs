//! Wait on a task

use crate::console::CliConsole;
use anyhow::{Context, Result};
use deepint_sdk::{DeepintClient, EntityFactory, ResolvePolicy, Task};
use std::time::Duration;

pub async fn wait(
    client: &DeepintClient,
    console: &CliConsole,
    workspace: &str,
    task_id: &str,
    interval_secs: u64,
    timeout_secs: u64,
) -> Result<()> {
    let ws = client.workspace(workspace);
    let task: Task = ws.scope().build(task_id);
    let policy = ResolvePolicy::new(
        Duration::from_secs(interval_secs.max(1)),
        Duration::from_secs(timeout_secs),
    );

    console.info(&format!(
        "Polling task {} every {}s (timeout {}s)",
        task_id, policy.poll_interval.as_secs(), timeout_secs
    ));
    task.resolve(policy)
        .await
        .with_context(|| format!("Waiting for task {}", task_id))?;
    console.success(&format!("Task {} succeeded", task_id));

    let result = task.fetch_result().await?;
    console.print_json(&result);
    Ok(())
}
