//! Supported languages.

use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A language the engine knows how to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Java,
}

impl Language {
    /// Label reported back to callers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// Infer a language from a source path's extension.
    ///
    /// Anything that is not `.py` or `.java` is treated as JavaScript.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("py") => Self::Python,
            Some("java") => Self::Java,
            _ => Self::JavaScript,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "node" => Ok(Self::JavaScript),
            "python" | "py" | "python3" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            other => Err(RequestError::UnsupportedLanguage(other.to_string())),
        }
    }
}
