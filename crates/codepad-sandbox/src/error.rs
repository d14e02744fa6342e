//! Sandbox error types.
//!
//! These never leave the engine: executors turn them into outcomes.

use std::io;
use thiserror::Error;

/// Errors that can occur while preparing or supervising a run.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A binary could not be launched.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Scratch space could not be created.
    #[error("Failed to prepare scratch space: {0}")]
    Scratch(io::Error),

    /// The script engine could not be set up.
    #[error("Script engine error: {0}")]
    Engine(String),
}

impl SandboxError {
    /// Create a new spawn error.
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

impl From<rquickjs::Error> for SandboxError {
    fn from(err: rquickjs::Error) -> Self {
        Self::Engine(err.to_string())
    }
}
