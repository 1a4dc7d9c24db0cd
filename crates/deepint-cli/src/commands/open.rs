//! Resolve a link to a resource

use crate::console::CliConsole;
use anyhow::Result;
use deepint_sdk::{DeepintClient, Entity, OpenedResource};

pub async fn open(client: &DeepintClient, console: &CliConsole, url: &str) -> Result<()> {
    let opened = client.open_url(url).await?;

    let name = match &opened {
        OpenedResource::Workspace(e) => e.name(),
        OpenedResource::Source(e) => e.name(),
        OpenedResource::Task(e) => e.name(),
        OpenedResource::Alert(e) => e.name(),
        OpenedResource::Model(e) => e.name(),
        OpenedResource::Dashboard(e) => e.name(),
        OpenedResource::Visualization(e) => e.name(),
    };

    console.success(&format!(
        "{} {} ({})",
        opened.kind(),
        opened.id(),
        name.as_deref().unwrap_or("unnamed")
    ));
    Ok(())
}
