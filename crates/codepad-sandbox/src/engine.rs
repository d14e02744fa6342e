//! Request dispatch.
//!
//! The engine resolves the language of a request, runs it on exactly one
//! executor, times it, and normalizes what came back. It holds no per-request
//! state, so one engine serves any number of concurrent requests.

use crate::executor::Executor;
use crate::input::InputFeed;
use crate::js::JsSandbox;
use crate::normalize::normalize;
use crate::process::ProcessExecutor;
use codepad_core::config::ExecutionConfig;
use codepad_core::{Config, ExecutionRequest, ExecutionResult, Language};
use std::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Runs requests on the executor for their language.
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    javascript: JsSandbox,
    python: ProcessExecutor,
    java: ProcessExecutor,
}

impl ExecutionEngine {
    /// Create an engine from the execution section of the config.
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            javascript: JsSandbox::new(config.javascript.clone())
                .with_max_output_size(config.max_output_bytes),
            python: ProcessExecutor::python(&config),
            java: ProcessExecutor::java(&config),
        }
    }

    /// Create an engine from a full config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.execution.clone())
    }

    /// Executor for a language.
    pub fn executor(&self, language: Language) -> &dyn Executor {
        match language {
            Language::JavaScript => &self.javascript,
            Language::Python => &self.python,
            Language::Java => &self.java,
        }
    }

    /// Run a request to completion.
    ///
    /// Never fails; every problem is reported through the result's terminal
    /// state and error lines.
    pub async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        let language = request.resolve_language();
        let request_id = Uuid::new_v4();
        let span = info_span!("execute", %request_id, %language);

        async move {
            let input = InputFeed::from_text(&request.input);
            let executor = self.executor(language);

            let started = Instant::now();
            let outcome = executor.run(&request.code, &input).await;
            let elapsed = started.elapsed();

            let result = normalize(outcome, elapsed, language);
            info!(
                executor = executor.name(),
                state = result.terminal_state.as_str(),
                duration_ms = result.duration_ms,
                "Execution finished"
            );
            result
        }
        .instrument(span)
        .await
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(ExecutionConfig::default())
    }
}
