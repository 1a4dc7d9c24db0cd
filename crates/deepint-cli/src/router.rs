//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use crate::console::CliConsole;
use anyhow::{Context, Result};
use deepint_sdk::{DeepintClient, ScanMode, version};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!("{}", version::version_info());
        return Ok(());
    }

    let client = build_client(&cli)?;
    let console = CliConsole::new(cli.verbose);
    tracing::debug!(
        command = cli.command.name(),
        streaming = cli.streaming,
        "dispatching command"
    );

    match cli.command {
        Commands::Workspaces => commands::listing::workspaces(&client, &console).await,
        Commands::Sources { workspace } => {
            commands::listing::sources(&client, &console, &workspace).await
        }
        Commands::Tasks { workspace, status } => {
            commands::listing::tasks(&client, &console, &workspace, status.as_deref()).await
        }
        Commands::Wait {
            workspace,
            task,
            interval,
            timeout,
        } => commands::wait::wait(&client, &console, &workspace, &task, interval, timeout).await,
        Commands::Open { url } => commands::open::open(&client, &console, &url).await,
        Commands::Call {
            method,
            path,
            params,
            headers,
            body,
            paginated,
        } => {
            let request = commands::call::CallRequest {
                method,
                path,
                params,
                headers,
                body,
                paginated,
            };
            commands::call::call(&client, &console, request).await
        }
        Commands::Version => Ok(()),
    }
}

fn build_client(cli: &Cli) -> Result<DeepintClient> {
    let client = match &cli.config {
        Some(path) => DeepintClient::from_file(path)
            .with_context(|| format!("Loading configuration from {}", path.display()))?,
        None => DeepintClient::from_env()
            .context("Set DEEPINT_TOKEN and DEEPINT_ORGANIZATION, or pass --config")?,
    };

    let mode = if cli.streaming {
        ScanMode::Streaming
    } else {
        ScanMode::Memoize
    };
    Ok(client.with_scan_mode(mode))
}
