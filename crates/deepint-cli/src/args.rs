//! CLI argument definitions using clap
//!
//! - deepint workspaces                   # List workspaces
//! - deepint sources <ws>                 # List sources of a workspace
//! - deepint tasks <ws> [--status s]      # List tasks, optionally by status
//! - deepint wait <ws> <task>             # Poll a task until it finishes
//! - deepint open <url>                   # Resolve a web or API link
//! - deepint call <method> <path>         # Raw API call

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deepint")]
#[command(about = "Command-line client for the Deep Intelligence API")]
#[command(
    long_about = r#"Command-line client for the Deep Intelligence API

Credentials come from --config, or from DEEPINT_TOKEN and DEEPINT_ORGANIZATION
(a .env file in the working directory is read first).

EXAMPLES:
  deepint workspaces
  deepint tasks <workspace_id> --status running
  deepint wait <workspace_id> <task_id> --timeout 600
  deepint call GET workspaces/ --paginated"#
)]
#[command(version)]
pub struct Cli {
    /// TOML or JSON configuration file (defaults to the environment)
    #[arg(long, global = true, env = "DEEPINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Scan listings without keeping what was skipped over
    #[arg(long, global = true)]
    pub streaming: bool,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List workspaces of the organization
    Workspaces,

    /// List sources of a workspace
    Sources {
        /// Workspace ID
        workspace: String,
    },

    /// List tasks of a workspace
    Tasks {
        /// Workspace ID
        workspace: String,

        /// Only tasks in this status (pending, running, success, failed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Wait for a task to finish and print its result
    Wait {
        /// Workspace ID
        workspace: String,

        /// Task ID
        task: String,

        /// Seconds between polls
        #[arg(long, default_value_t = 5)]
        interval: u64,

        /// Seconds before giving up
        #[arg(long, default_value_t = 1800)]
        timeout: u64,
    },

    /// Load the resource a web or API link points at
    Open {
        /// Link to a workspace or a resource inside one
        url: String,
    },

    /// Call an API endpoint directly
    Call {
        /// GET, POST, PUT or DELETE
        method: String,

        /// Path relative to the API base URL, e.g. workspace/<id>/sources
        path: String,

        /// Parameter as key=value (query string for GET/DELETE, JSON body otherwise)
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,

        /// Extra header as key=value
        #[arg(long = "header", short = 'H')]
        headers: Vec<String>,

        /// Raw JSON parameters; merged under any --param values
        #[arg(long)]
        body: Option<String>,

        /// Follow pagination and print every item
        #[arg(long)]
        paginated: bool,
    },

    /// Show SDK and API versions
    Version,
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Workspaces => "workspaces",
            Commands::Sources { .. } => "sources",
            Commands::Tasks { .. } => "tasks",
            Commands::Wait { .. } => "wait",
            Commands::Open { .. } => "open",
            Commands::Call { .. } => "call",
            Commands::Version => "version",
        }
    }
}
