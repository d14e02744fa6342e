//! Environment variable handling.

use std::collections::HashMap;
use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
pub fn get_var_or(name: &str, default: &str) -> String {
    get_var(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Get an environment variable as a u16 (e.g., for ports).
pub fn get_u16(name: &str) -> Option<u16> {
    get_var(name).and_then(|v| v.parse().ok())
}

/// Host variables passed through to child processes.
pub const PASSTHROUGH_VARS: &[&str] = &[
    "PATH",
    "HOME",
    "LANG",
    "LC_ALL",
    "TMPDIR",
    "JAVA_HOME",
    "SYSTEMROOT",
];

/// Build the environment for an untrusted child process from the current one.
///
/// Only [`PASSTHROUGH_VARS`] survive; everything else is dropped.
pub fn child_env() -> HashMap<String, String> {
    let current: HashMap<String, String> = env::vars().collect();
    filter_passthrough(&current)
}

/// Keep only the passthrough variables of `env`.
pub fn filter_passthrough(env: &HashMap<String, String>) -> HashMap<String, String> {
    env.iter()
        .filter(|(k, _)| PASSTHROUGH_VARS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Common environment variable names.
pub mod vars {
    /// Codepad home directory override.
    pub const CODEPAD_HOME: &str = "CODEPAD_HOME";

    /// Codepad config file override.
    pub const CODEPAD_CONFIG: &str = "CODEPAD_CONFIG";

    /// HTTP port override.
    pub const CODEPAD_PORT: &str = "CODEPAD_PORT";

    /// Python interpreter override.
    pub const CODEPAD_PYTHON: &str = "CODEPAD_PYTHON";
}
