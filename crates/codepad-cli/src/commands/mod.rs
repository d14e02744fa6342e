//! CLI command implementations.

pub mod config;
pub mod run;
pub mod serve;

use codepad_core::config::Config;
use codepad_core::error::ConfigError;
use std::path::Path;

/// Load the config from `path`, or from the default location.
///
/// A missing default file means defaults with environment overrides; an
/// explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => match Config::load_default() {
            Err(ConfigError::NotFound(_)) => Ok(Config::from_env_defaults()),
            other => other,
        },
    }
}
