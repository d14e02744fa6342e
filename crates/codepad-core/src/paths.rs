//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Codepad base directory (~/.codepad).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = crate::env::get_var(crate::env::vars::CODEPAD_HOME) {
        return Ok(expand_tilde(&home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".codepad"))
}

/// Get the main config file path (~/.codepad/codepad.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("codepad.json5"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name() {
        let file = config_file().unwrap();
        assert!(file.ends_with("codepad.json5"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/test");
        assert!(!expanded.to_string_lossy().contains('~'));
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
