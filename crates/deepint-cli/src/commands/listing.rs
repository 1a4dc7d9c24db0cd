//! Listing commands: workspaces, sources and tasks

use crate::console::CliConsole;
use anyhow::Result;
use deepint_sdk::{DeepintClient, Entity, TaskStatus};

/// Workspaces of the client's organization
pub async fn workspaces(client: &DeepintClient, console: &CliConsole) -> Result<()> {
    let workspaces = client.organization().workspaces().fetch_all(false).await?;

    console.print_header(&format!("Workspaces of {}", client.organization().id()));
    let widths = [36, 32, 8];
    console.print_table_header(&["ID", "Name", "Sources"], &widths);
    for ws in &workspaces {
        let info = ws.info();
        let sources = info
            .sources_count
            .map(|n| n.to_string())
            .unwrap_or_default();
        console.print_row(
            &[ws.id(), info.name.as_deref().unwrap_or("-"), &sources],
            &widths,
        );
    }
    console.info(&format!("{} workspaces", workspaces.len()));
    Ok(())
}

pub async fn sources(client: &DeepintClient, console: &CliConsole, workspace: &str) -> Result<()> {
    let ws = client.workspace(workspace);
    let sources = ws.sources().fetch_all(false).await?;

    console.print_header(&format!("Sources of {}", workspace));
    let widths = [36, 32, 10, 8];
    console.print_table_header(&["ID", "Name", "Instances", "Features"], &widths);
    for source in &sources {
        let info = source.info();
        let instances = info.instances.map(|n| n.to_string()).unwrap_or_default();
        let features = info.features.len().to_string();
        console.print_row(
            &[
                source.id(),
                info.name.as_deref().unwrap_or("-"),
                &instances,
                &features,
            ],
            &widths,
        );
    }
    console.info(&format!("{} sources", sources.len()));
    Ok(())
}

pub async fn tasks(
    client: &DeepintClient,
    console: &CliConsole,
    workspace: &str,
    status: Option<&str>,
) -> Result<()> {
    let ws = client.workspace(workspace);
    let tasks = match status {
        Some(raw) => {
            let status: TaskStatus = raw.parse()?;
            ws.tasks().fetch_by_status(status, false).await?
        }
        None => ws.tasks().fetch_all(false).await?,
    };

    console.print_header(&format!("Tasks of {}", workspace));
    let widths = [36, 32, 10, 8];
    console.print_table_header(&["ID", "Name", "Status", "Progress"], &widths);
    for task in &tasks {
        let info = task.info();
        let progress = info
            .progress
            .map(|p| format!("{}%", p))
            .unwrap_or_default();
        console.print_row(
            &[
                task.id(),
                info.name.as_deref().unwrap_or("-"),
                info.status.as_str(),
                &progress,
            ],
            &widths,
        );
    }
    console.info(&format!("{} tasks", tasks.len()));
    Ok(())
}
