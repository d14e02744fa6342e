//! Bounded code execution for Codepad.
//!
//! This crate runs untrusted snippets to a bounded, normalized result:
//! - JavaScript: in-process on a fresh embedded engine context
//! - Python: interpreted in a supervised subprocess
//! - Java: compiled, then run in a supervised subprocess
//!
//! [`ExecutionEngine`] is the entry point; it dispatches each request to one
//! [`Executor`] and normalizes the outcome.

pub mod engine;
pub mod error;
pub mod executor;
pub mod input;
pub mod js;
pub mod normalize;
pub mod outcome;
pub mod process;
pub mod scratch;

pub use engine::ExecutionEngine;
pub use error::SandboxError;
pub use executor::Executor;
pub use input::{InputExhausted, InputFeed, InputReader};
pub use js::JsSandbox;
pub use normalize::{normalize, GENERIC_FAILURE_MESSAGE, TIMEOUT_MESSAGE, TRUNCATION_MARKER};
pub use outcome::ExecutionOutcome;
pub use process::{CompileStrategy, InterpretStrategy, LanguageStrategy, ProcessExecutor};
pub use scratch::{ScratchArea, ScratchDir};

/// Result type for sandbox operations.
pub type Result<T> = std::result::Result<T, SandboxError>;
