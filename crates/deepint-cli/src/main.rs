//! Deep Intelligence CLI
//!
//! Lists and inspects resources of one organization, waits on tasks and issues
//! raw API calls.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/deepint-cli
//! ```
//!
//! Set `RUST_LOG=deepint_core=debug` to see every request.

mod args;
mod commands;
mod console;
mod router;

use clap::Parser;
use console::CliConsole;

pub use args::{Cli, Commands};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = router::route(cli).await {
        CliConsole::new(false).error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
