//! Raw per-executor outcome, before normalization.

use crate::normalize::split_lines;
use codepad_core::TerminalState;

/// What a single executor invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Output lines, in production order.
    pub stdout_lines: Vec<String>,

    /// Error lines, in production order.
    pub stderr_lines: Vec<String>,

    /// How the run ended.
    pub terminal_state: TerminalState,
}

impl ExecutionOutcome {
    /// Build an outcome from already separated lines.
    pub fn new(
        stdout_lines: Vec<String>,
        stderr_lines: Vec<String>,
        terminal_state: TerminalState,
    ) -> Self {
        Self {
            stdout_lines,
            stderr_lines,
            terminal_state,
        }
    }

    /// Build an outcome from accumulated stream text.
    pub fn from_streams(stdout: &str, stderr: &str, terminal_state: TerminalState) -> Self {
        Self::new(split_lines(stdout), split_lines(stderr), terminal_state)
    }

    /// An outcome with no output and a single error line.
    pub fn failure(terminal_state: TerminalState, message: impl Into<String>) -> Self {
        Self::new(Vec::new(), vec![message.into()], terminal_state)
    }
}
