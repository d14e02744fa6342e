//! Execution request and result types.

use super::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single piece of code to run, with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    /// Source text. May be empty.
    #[serde(default)]
    pub code: String,

    /// Raw standard input, split into lines by the executor.
    #[serde(default)]
    pub input: String,

    /// Explicit language. Wins over anything inferred from `source_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<Language>,

    /// Informational source path, used for language inference and labeling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl ExecutionRequest {
    /// Create a request for the given code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    /// Set the standard input.
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Set the language explicitly.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language_hint = Some(language);
        self
    }

    /// Set the source path.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Resolve the effective language: explicit hint, then path suffix,
    /// then JavaScript.
    pub fn resolve_language(&self) -> Language {
        if let Some(language) = self.language_hint {
            return language;
        }
        self.source_path
            .as_ref()
            .map(Language::from_path)
            .unwrap_or_default()
    }
}

/// How an execution ended. Exactly one applies to every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminalState {
    Completed,
    RuntimeError,
    TimedOut,
    SpawnFailed,
    CompileFailed,
}

impl TerminalState {
    /// Whether the code ran to completion without failing.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::RuntimeError => "runtimeError",
            Self::TimedOut => "timedOut",
            Self::SpawnFailed => "spawnFailed",
            Self::CompileFailed => "compileFailed",
        }
    }
}

/// Result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Captured output lines, in production order.
    pub logs: Vec<String>,

    /// Captured error lines, in production order.
    pub errors: Vec<String>,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,

    /// Resolved language label.
    pub language: String,

    /// How the execution ended.
    pub terminal_state: TerminalState,
}

impl ExecutionResult {
    /// Check if execution was successful.
    pub fn success(&self) -> bool {
        self.terminal_state.is_success()
    }
}
