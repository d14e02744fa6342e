//! Configuration loading and persistence.

use super::{BindMode, Config, LogLevel};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Gateway
        if self.gateway.port == 0 {
            errors.push("Gateway port cannot be 0".to_string());
        }
        if self.gateway.max_body_bytes == 0 {
            errors.push("Gateway max_body_bytes must be greater than 0".to_string());
        }

        // 2. JavaScript bounds
        let js = &self.execution.javascript;
        if js.sync_timeout_ms == 0 {
            errors.push("JavaScript sync_timeout_ms must be greater than 0".to_string());
        }
        if js.outer_timeout_ms < js.sync_timeout_ms {
            errors.push(format!(
                "JavaScript outer_timeout_ms ({}) must not be shorter than sync_timeout_ms ({})",
                js.outer_timeout_ms, js.sync_timeout_ms
            ));
        }

        // 3. Subprocess bounds
        let python = &self.execution.python;
        if python.timeout_ms == 0 {
            errors.push("Python timeout_ms must be greater than 0".to_string());
        }
        let java = &self.execution.java;
        if java.compile_timeout_ms == 0 {
            errors.push("Java compile_timeout_ms must be greater than 0".to_string());
        }
        if java.run_timeout_ms == 0 {
            errors.push("Java run_timeout_ms must be greater than 0".to_string());
        }

        // 4. Binaries
        for (name, binary) in [
            ("python.interpreter", &python.interpreter),
            ("java.compiler", &java.compiler),
            ("java.runtime", &java.runtime),
        ] {
            if binary.trim().is_empty() {
                errors.push(format!("Execution {} must not be empty", name));
            }
        }

        // 5. Output capture
        if self.execution.max_output_bytes == 0 {
            errors.push("Execution max_output_bytes must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Load configuration from the default path, falling back to defaults if no file exists.
    pub fn load_or_default() -> Self {
        match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::from_env_defaults(),
            Err(_) => Self::default(),
        }
    }

    /// Create a Config from defaults, with environment overrides applied.
    pub fn from_env_defaults() -> Self {
        use crate::env;

        let mut config = Self::default();

        if let Some(port) = env::get_u16(env::vars::CODEPAD_PORT) {
            config.gateway.port = port;
        }
        if let Some(interpreter) = env::get_var(env::vars::CODEPAD_PYTHON) {
            config.execution.python.interpreter = interpreter;
        }

        config
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gateway port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.gateway.port = port;
        self
    }

    /// Set the bind mode.
    pub fn bind(mut self, mode: BindMode) -> Self {
        self.config.gateway.bind = mode;
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set both JavaScript bounds.
    pub fn javascript_timeouts(mut self, sync_ms: u64, outer_ms: u64) -> Self {
        self.config.execution.javascript.sync_timeout_ms = sync_ms;
        self.config.execution.javascript.outer_timeout_ms = outer_ms;
        self
    }

    /// Set the Python interpreter.
    pub fn python_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.config.execution.python.interpreter = interpreter.into();
        self
    }

    /// Set the scratch directory.
    pub fn scratch_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.execution.scratch_dir = Some(dir.into());
        self
    }

    /// Build the config.
    pub fn build(self) -> Config {
        self.config
    }

    /// Validate and build the config, returning an error if validation fails.
    pub fn build_validated(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
