//! The executor contract shared by every execution family.

use crate::input::InputFeed;
use crate::outcome::ExecutionOutcome;
use async_trait::async_trait;

/// Runs one piece of code to a bounded outcome.
///
/// Implementations never fail: launch problems, crashes, and timeouts are all
/// reported through [`ExecutionOutcome::terminal_state`].
#[async_trait]
pub trait Executor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run `code`, feeding it `input`.
    async fn run(&self, code: &str, input: &InputFeed) -> ExecutionOutcome;
}
