//! In-process JavaScript execution on an embedded QuickJS engine.
//!
//! Every run gets a brand-new runtime and context on a blocking worker. The
//! engine's interrupt hook enforces the [`Deadline`], and a small event loop
//! drives promise jobs and timers until the main promise settles. The async
//! caller abandons the worker if it overruns the outer bound.

mod bindings;
mod deadline;

pub use deadline::Deadline;

use crate::error::SandboxError;
use crate::executor::Executor;
use crate::input::InputFeed;
use crate::outcome::ExecutionOutcome;
use async_trait::async_trait;
use bindings::{Console, Hooks, Settlement};
use codepad_core::config::JavaScriptConfig;
use codepad_core::TerminalState;
use rquickjs::convert::Coerced;
use rquickjs::{Context, Ctx, Function, Runtime, Value};
use std::thread;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Extra time the caller waits for a worker past the outer bound.
const ABANDON_GRACE: Duration = Duration::from_millis(250);

/// Executor for JavaScript.
#[derive(Debug, Clone)]
pub struct JsSandbox {
    config: JavaScriptConfig,
    max_output_bytes: usize,
}

impl JsSandbox {
    pub fn new(config: JavaScriptConfig) -> Self {
        Self {
            config,
            max_output_bytes: 1024 * 1024, // 1 MiB default
        }
    }

    /// Set maximum captured size per console channel.
    pub fn with_max_output_size(mut self, size: usize) -> Self {
        self.max_output_bytes = size;
        self
    }
}

#[async_trait]
impl Executor for JsSandbox {
    fn name(&self) -> &'static str {
        "javascript"
    }

    async fn run(&self, code: &str, input: &InputFeed) -> ExecutionOutcome {
        let deadline = Deadline::new(self.config.sync_timeout(), self.config.outer_timeout());
        let console = Console::new(self.max_output_bytes);

        let worker = tokio::task::spawn_blocking({
            let code = code.to_string();
            let input = input.clone();
            let console = console.clone();
            let deadline = deadline.clone();
            let config = self.config.clone();
            move || evaluate(&code, &input, &console, &deadline, &config)
        });

        match timeout(deadline.outer_limit() + ABANDON_GRACE, worker).await {
            Ok(Ok(Ok(state))) => console.snapshot(state),
            Ok(Ok(Err(e))) => {
                error!("Failed to start script engine: {}", e);
                console.error(e.to_string());
                console.snapshot(TerminalState::RuntimeError)
            }
            Ok(Err(e)) => {
                error!("Script worker failed: {}", e);
                console.error("Script engine stopped unexpectedly");
                console.snapshot(TerminalState::RuntimeError)
            }
            Err(_) => {
                warn!("Abandoning script worker after {:?}", deadline.outer_limit());
                console.snapshot(TerminalState::TimedOut)
            }
        }
    }
}

/// Run `code` to a terminal state on the current thread.
fn evaluate(
    code: &str,
    input: &InputFeed,
    console: &Console,
    deadline: &Deadline,
    config: &JavaScriptConfig,
) -> Result<TerminalState, SandboxError> {
    let runtime = Runtime::new()?;
    runtime.set_memory_limit(config.memory_limit_bytes);
    runtime.set_max_stack_size(config.max_stack_bytes);
    runtime.set_interrupt_handler(Some(Box::new({
        let deadline = deadline.clone();
        move || deadline.expired()
    })));

    let context = Context::full(&runtime)?;
    let state = context.with(|ctx| {
        let hooks = match bindings::install(&ctx, console.clone(), input.reader(), deadline.clone()) {
            Ok(hooks) => hooks,
            Err(e) => return fail(&ctx, e, console, deadline),
        };
        drive(&ctx, code, &hooks, console, deadline)
    });

    debug!("Script finished as {:?}", state);
    Ok(state)
}

/// Evaluate the wrapped code and pump jobs and timers until settlement.
fn drive<'js>(
    ctx: &Ctx<'js>,
    code: &str,
    hooks: &Hooks<'js>,
    console: &Console,
    deadline: &Deadline,
) -> TerminalState {
    let main: Function<'js> = match ctx.eval(format!("(async () => {{\n{}\n}})", code)) {
        Ok(main) => main,
        Err(e) => return fail(ctx, e, console, deadline),
    };
    let promise: Value<'js> = match main.call(()) {
        Ok(promise) => promise,
        Err(e) => return fail(ctx, e, console, deadline),
    };

    // The synchronous phase ends at the first suspension.
    deadline.begin_await();

    let settlement = Settlement::default();
    let watched = bindings::settlement_callback(ctx, settlement.clone())
        .and_then(|done| hooks.watch.call::<_, ()>((promise, done)));
    if let Err(e) = watched {
        return fail(ctx, e, console, deadline);
    }

    loop {
        while ctx.execute_pending_job() {
            if deadline.expired() {
                return TerminalState::TimedOut;
            }
        }
        if deadline.expired() {
            return TerminalState::TimedOut;
        }

        if let Some(result) = settlement.lock().take() {
            return match result {
                Ok(()) if console.faulted() => TerminalState::RuntimeError,
                Ok(()) => TerminalState::Completed,
                Err(message) => {
                    console.error(message);
                    TerminalState::RuntimeError
                }
            };
        }

        let wait: f64 = match hooks.tick.call(()) {
            Ok(wait) => wait,
            Err(e) => return fail(ctx, e, console, deadline),
        };
        if wait < 0.0 {
            debug!("Main promise can never settle");
            return TerminalState::TimedOut;
        }
        if wait > 0.0 {
            thread::sleep(Duration::from_secs_f64(wait / 1000.0).min(deadline.remaining()));
        }
    }
}

/// Classify an engine error as a timeout or a reported runtime error.
fn fail(ctx: &Ctx<'_>, error: rquickjs::Error, console: &Console, deadline: &Deadline) -> TerminalState {
    let message = if error.is_exception() {
        describe(ctx.catch())
    } else {
        error.to_string()
    };

    if deadline.tripped() {
        debug!("Interrupted: {}", message);
        return TerminalState::TimedOut;
    }
    console.error(message);
    TerminalState::RuntimeError
}

/// `message` of an Error object, string coercion for anything else.
fn describe(value: Value<'_>) -> String {
    if let Some(message) = value.as_exception().and_then(|e| e.message()) {
        return message;
    }
    value
        .get::<Coerced<String>>()
        .map(|text| text.0)
        .unwrap_or_else(|_| "Unknown error".to_string())
}
