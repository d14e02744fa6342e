//! Codepad command-line interface.

pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Codepad - bounded code execution for JavaScript, Python and Java
#[derive(Parser)]
#[command(name = "codepad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "CODEPAD_CONFIG", global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Execute a source file once
    Run(commands::run::RunArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, config_path).await,
        Commands::Run(args) => commands::run::run(args, config_path).await,
        Commands::Config(args) => commands::config::run(args, config_path).await,
    }
}
