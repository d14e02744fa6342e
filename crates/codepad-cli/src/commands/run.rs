//! Run command: execute one file through the engine.

use super::load_config;
use anyhow::Context;
use clap::Args;
use codepad_core::{ExecutionRequest, ExecutionResult, Language};
use codepad_sandbox::ExecutionEngine;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run command arguments.
#[derive(Args)]
pub struct RunArgs {
    /// Source file to execute
    pub file: PathBuf,

    /// Language (javascript, python, java); inferred from the extension by default
    #[arg(short, long)]
    pub language: Option<String>,

    /// File whose contents become standard input
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Build the engine request for a file.
pub async fn build_request(args: &RunArgs) -> anyhow::Result<ExecutionRequest> {
    let code = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let input = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input {}", path.display()))?,
        None => String::new(),
    };

    let mut request = ExecutionRequest::new(code)
        .with_input(input)
        .with_source_path(&args.file);
    if let Some(language) = &args.language {
        request = request.with_language(language.parse::<Language>()?);
    }

    Ok(request)
}

/// Print a result; logs to stdout, errors to stderr.
fn report(result: &ExecutionResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for line in &result.logs {
        println!("{}", line);
    }
    for line in &result.errors {
        eprintln!("{}", line);
    }
    Ok(())
}

/// Run the run command.
pub async fn run(args: RunArgs, config_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path)?;
    config.validate()?;

    let request = build_request(&args).await?;
    let engine = ExecutionEngine::from_config(&config);
    let result = engine.execute(request).await;

    report(&result, args.json)?;

    Ok(if result.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
