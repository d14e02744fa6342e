//! Codepad CLI entry point.

use clap::Parser;
use codepad_cli::{commands, logging, run, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; a broken config is reported by the command itself
    let settings = commands::load_config(cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();
    logging::init(cli.verbose, &settings);

    // Run the command
    run(cli).await
}
