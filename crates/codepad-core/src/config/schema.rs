//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main Codepad configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Execution engine settings.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind mode.
    #[serde(default)]
    pub bind: BindMode,

    /// Port number.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Answer CORS preflights and add permissive CORS headers.
    #[serde(default = "default_true")]
    pub cors: bool,

    /// Largest accepted request body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: BindMode::default(),
            port: default_port(),
            cors: default_true(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    1_000_000
}

/// Bind mode for the HTTP server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Bind to loopback only (127.0.0.1).
    #[default]
    Loopback,
    /// Bind to all interfaces (0.0.0.0).
    Lan,
}

/// Execution engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// In-process JavaScript sandbox.
    #[serde(default)]
    pub javascript: JavaScriptConfig,

    /// Python interpreter.
    #[serde(default)]
    pub python: PythonConfig,

    /// Java compiler and runtime.
    #[serde(default)]
    pub java: JavaConfig,

    /// Directory for per-run scratch files. Defaults to the OS temp dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// Maximum captured bytes per output stream of a subprocess.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            javascript: JavaScriptConfig::default(),
            python: PythonConfig::default(),
            java: JavaConfig::default(),
            scratch_dir: None,
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

fn default_max_output_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

/// JavaScript sandbox limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JavaScriptConfig {
    /// Bound on the synchronous part of the script.
    #[serde(default = "default_js_sync_timeout")]
    pub sync_timeout_ms: u64,

    /// Bound on the whole run, including awaited promises and timers.
    #[serde(default = "default_js_outer_timeout")]
    pub outer_timeout_ms: u64,

    /// Heap limit for the script engine.
    #[serde(default = "default_js_memory")]
    pub memory_limit_bytes: usize,

    /// Stack limit for the script engine.
    #[serde(default = "default_js_stack")]
    pub max_stack_bytes: usize,
}

fn default_js_sync_timeout() -> u64 {
    1000
}

fn default_js_outer_timeout() -> u64 {
    1500
}

fn default_js_memory() -> usize {
    64 * 1024 * 1024 // 64 MiB
}

fn default_js_stack() -> usize {
    1024 * 1024 // 1 MiB
}

impl Default for JavaScriptConfig {
    fn default() -> Self {
        Self {
            sync_timeout_ms: default_js_sync_timeout(),
            outer_timeout_ms: default_js_outer_timeout(),
            memory_limit_bytes: default_js_memory(),
            max_stack_bytes: default_js_stack(),
        }
    }
}

impl JavaScriptConfig {
    /// Synchronous bound as a duration.
    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms)
    }

    /// Outer bound as a duration.
    pub fn outer_timeout(&self) -> Duration {
        Duration::from_millis(self.outer_timeout_ms)
    }
}

/// Python interpreter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Interpreter binary, looked up on `PATH` when not absolute.
    #[serde(default = "default_python")]
    pub interpreter: String,

    /// Wall-clock bound for the interpreter process.
    #[serde(default = "default_python_timeout")]
    pub timeout_ms: u64,
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_python_timeout() -> u64 {
    3000
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: default_python(),
            timeout_ms: default_python_timeout(),
        }
    }
}

/// Java compiler and runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JavaConfig {
    /// Compiler binary.
    #[serde(default = "default_javac")]
    pub compiler: String,

    /// Runtime binary.
    #[serde(default = "default_java")]
    pub runtime: String,

    /// Wall-clock bound for the compiler.
    #[serde(default = "default_java_compile_timeout")]
    pub compile_timeout_ms: u64,

    /// Wall-clock bound for the compiled program.
    #[serde(default = "default_java_run_timeout")]
    pub run_timeout_ms: u64,
}

fn default_javac() -> String {
    "javac".to_string()
}

fn default_java() -> String {
    "java".to_string()
}

fn default_java_compile_timeout() -> u64 {
    3000
}

fn default_java_run_timeout() -> u64 {
    4000
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            compiler: default_javac(),
            runtime: default_java(),
            compile_timeout_ms: default_java_compile_timeout(),
            run_timeout_ms: default_java_run_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
