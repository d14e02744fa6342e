//! Conversion of executor outcomes into the caller-facing result.
//!
//! Every executor goes through [`normalize`], so the external shape never
//! depends on which executor ran.

use crate::outcome::ExecutionOutcome;
use codepad_core::{ExecutionResult, Language, TerminalState};
use std::time::Duration;

/// Error line attached to every timed-out run.
pub const TIMEOUT_MESSAGE: &str = "Execution timeout";

/// Error line used when a failed run produced no error text of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Process terminated or exited with errors.";

/// Last line of a stream that hit the capture limit.
pub const TRUNCATION_MARKER: &str = "[output truncated]";

/// Split accumulated stream text into lines.
///
/// A single trailing line terminator is dropped and blank text yields no
/// lines at all.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let body = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);

    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Attach duration and language to an outcome and enforce the error rules.
pub fn normalize(outcome: ExecutionOutcome, duration: Duration, language: Language) -> ExecutionResult {
    let ExecutionOutcome {
        stdout_lines,
        mut stderr_lines,
        terminal_state,
    } = outcome;

    if terminal_state == TerminalState::TimedOut
        && !stderr_lines.iter().any(|line| line == TIMEOUT_MESSAGE)
    {
        stderr_lines.push(TIMEOUT_MESSAGE.to_string());
    }

    if !terminal_state.is_success() && stderr_lines.is_empty() {
        stderr_lines.push(GENERIC_FAILURE_MESSAGE.to_string());
    }

    ExecutionResult {
        logs: stdout_lines,
        errors: stderr_lines,
        duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        language: language.label().to_string(),
        terminal_state,
    }
}
