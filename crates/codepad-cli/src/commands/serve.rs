//! Serve command.

use super::load_config;
use clap::Args;
use codepad_core::config::BindMode;
use codepad_gateway::Gateway;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Serve command arguments.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind mode (loopback, lan)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Port number
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Parse a bind mode name.
pub fn parse_bind(bind: &str) -> anyhow::Result<BindMode> {
    match bind {
        "loopback" => Ok(BindMode::Loopback),
        "lan" => Ok(BindMode::Lan),
        _ => anyhow::bail!("Invalid bind mode: {}", bind),
    }
}

/// Run the serve command.
pub async fn run(args: ServeArgs, config_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let mut config = load_config(config_path)?;

    if let Some(bind) = args.bind {
        config.gateway.bind = parse_bind(&bind)?;
    }
    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    config.validate()?;

    let gateway = Gateway::from_config(&config);
    info!("Serving on {}", gateway.bind_address());
    gateway.run().await?;

    Ok(ExitCode::SUCCESS)
}
