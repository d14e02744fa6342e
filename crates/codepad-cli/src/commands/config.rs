//! Configuration management commands.

use super::load_config;
use clap::Args;
use codepad_core::config::Config;
use codepad_core::paths;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Look up a dot-separated key in the serialized config.
pub fn lookup(config: &Config, key: &str) -> anyhow::Result<serde_json::Value> {
    let json = serde_json::to_value(config)?;
    key.split('.')
        .try_fold(&json, |value, part| value.get(part))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Key not found: {}", key))
}

fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Run the config command.
pub async fn run(args: ConfigArgs, explicit: Option<&Path>) -> anyhow::Result<ExitCode> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config(explicit)?;
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Get { key } => {
            let config = load_config(explicit)?;
            println!("{}", serde_json::to_string_pretty(&lookup(&config, &key)?)?);
        }

        ConfigCommand::Init { force } => {
            let path = config_path(explicit)?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            Config::from_env_defaults().save(&path)?;
            println!("Created config file: {}", path.display());
        }

        ConfigCommand::Path => {
            println!("{}", config_path(explicit)?.display());
        }

        ConfigCommand::Validate => {
            let config = load_config(explicit)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_nested_key() {
        let config = Config::default();
        assert_eq!(lookup(&config, "gateway.port").unwrap(), serde_json::json!(3000));
        assert_eq!(
            lookup(&config, "execution.python.interpreter").unwrap(),
            serde_json::json!("python3")
        );
    }

    #[test]
    fn test_lookup_missing_key() {
        let err = lookup(&Config::default(), "gateway.nope").unwrap_err();
        assert!(err.to_string().contains("gateway.nope"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codepad.json5");
        std::fs::write(&path, "{}").unwrap();

        let args = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        assert!(run(args, Some(&path)).await.is_err());

        let args = ConfigArgs {
            command: ConfigCommand::Init { force: true },
        };
        run(args, Some(&path)).await.unwrap();
        assert!(Config::load(&path).is_ok());
    }
}
