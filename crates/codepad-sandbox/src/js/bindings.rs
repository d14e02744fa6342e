//! Globals installed into each script context.
//!
//! The script-facing surface is written in JavaScript so argument joining and
//! timer bookkeeping follow the language's own semantics. It talks to Rust
//! through three plain functions handed to the prelude: `emit`, `read` and
//! `now`. None of them are reachable from user code.

use super::deadline::Deadline;
use crate::input::InputReader;
use crate::normalize::TRUNCATION_MARKER;
use crate::outcome::ExecutionOutcome;
use codepad_core::TerminalState;
use parking_lot::Mutex;
use rquickjs::{Ctx, Function, Object};
use std::sync::Arc;

const CHANNEL_STDOUT: u32 = 0;
/// Stderr line from an error that escaped a timer callback.
const CHANNEL_FAULT: u32 = 2;

const PRELUDE: &str = r#"
(emit, read, now) => {
  const STDOUT = 0, STDERR = 1, FAULT = 2;
  const text = (args) => args.join(' ');
  const describe = (error) => (error instanceof Error ? error.message : String(error));

  globalThis.console = {
    log: (...args) => emit(STDOUT, text(args)),
    error: (...args) => emit(STDERR, text(args)),
    warn: (...args) => emit(STDOUT, 'WARN: ' + text(args)),
    info: (...args) => emit(STDOUT, 'INFO: ' + text(args)),
  };

  const getInput = () => {
    const line = read();
    if (line === undefined) {
      throw new Error('No more input available.');
    }
    return line;
  };
  globalThis.getInput = getInput;
  globalThis.readLine = getInput;
  globalThis.prompt = (message) => {
    emit(STDOUT, `PROMPT: ${message}`);
    return getInput();
  };

  const timers = new Map();
  let nextId = 1;
  const schedule = (callback, delay, args, repeat) => {
    const id = nextId++;
    const ms = Math.max(0, Number(delay) || 0);
    timers.set(id, { callback, ms, args, repeat, due: now() + ms });
    return id;
  };
  const cancel = (id) => { timers.delete(id); };
  globalThis.setTimeout = (callback, delay, ...args) => schedule(callback, delay, args, false);
  globalThis.setInterval = (callback, delay, ...args) => schedule(callback, delay, args, true);
  globalThis.clearTimeout = cancel;
  globalThis.clearInterval = cancel;

  // Fires at most one due timer. Returns 0 after firing, the wait in ms until
  // the next timer, or -1 when nothing is scheduled.
  const tick = () => {
    let next;
    for (const entry of timers) {
      if (next === undefined || entry[1].due < next[1].due) next = entry;
    }
    if (next === undefined) return -1;

    const [id, timer] = next;
    const wait = timer.due - now();
    if (wait > 0) return wait;

    if (timer.repeat) {
      timer.due = now() + Math.max(1, timer.ms);
    } else {
      timers.delete(id);
    }
    try {
      if (typeof timer.callback === 'function') timer.callback(...timer.args);
    } catch (error) {
      emit(FAULT, describe(error));
    }
    return 0;
  };

  const watch = (promise, done) => {
    Promise.resolve(promise).then(
      () => done(true, ''),
      (error) => done(false, describe(error)),
    );
  };

  return { tick, watch };
}
"#;

/// Lines captured on one channel, bounded by their total size.
#[derive(Debug)]
struct Channel {
    lines: Vec<String>,
    bytes: usize,
    limit: usize,
    truncated: bool,
}

impl Channel {
    fn new(limit: usize) -> Self {
        Self {
            lines: Vec::new(),
            bytes: 0,
            limit,
            truncated: false,
        }
    }

    /// Keep `line` if it fits, counting its terminator.
    fn push(&mut self, line: String) {
        let cost = line.len() + 1;
        if self.truncated || self.bytes + cost > self.limit {
            self.truncated = true;
            return;
        }
        self.bytes += cost;
        self.lines.push(line);
    }

    fn to_lines(&self) -> Vec<String> {
        let mut lines = self.lines.clone();
        if self.truncated {
            lines.push(TRUNCATION_MARKER.to_string());
        }
        lines
    }
}

#[derive(Debug)]
struct Buffers {
    stdout: Channel,
    stderr: Channel,
    faulted: bool,
}

/// Output buffers shared between the script thread and the caller.
///
/// The caller may snapshot them at any time, including after abandoning a
/// worker that is still running. Each channel keeps at most `limit` bytes.
#[derive(Debug, Clone)]
pub struct Console {
    inner: Arc<Mutex<Buffers>>,
}

impl Console {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Buffers {
                stdout: Channel::new(limit),
                stderr: Channel::new(limit),
                faulted: false,
            })),
        }
    }

    fn emit(&self, channel: u32, line: String) {
        let mut buffers = self.inner.lock();
        match channel {
            CHANNEL_STDOUT => buffers.stdout.push(line),
            CHANNEL_FAULT => {
                buffers.faulted = true;
                buffers.stderr.push(line);
            }
            _ => buffers.stderr.push(line),
        }
    }

    /// Record an error line from the host. Never dropped by the size limit.
    pub fn error(&self, line: impl Into<String>) {
        self.inner.lock().stderr.lines.push(line.into());
    }

    /// Whether a timer callback raised.
    pub fn faulted(&self) -> bool {
        self.inner.lock().faulted
    }

    /// Copy the buffers into an outcome.
    pub fn snapshot(&self, terminal_state: TerminalState) -> ExecutionOutcome {
        let buffers = self.inner.lock();
        ExecutionOutcome::new(buffers.stdout.to_lines(), buffers.stderr.to_lines(), terminal_state)
    }
}

/// Settlement of the script's main promise.
pub type Settlement = Arc<Mutex<Option<Result<(), String>>>>;

/// Rust-side handles on the prelude.
pub struct Hooks<'js> {
    /// Fires one due timer; see the prelude for the return convention.
    pub tick: Function<'js>,

    /// Attaches settlement callbacks to a promise.
    pub watch: Function<'js>,
}

/// Install the script globals into `ctx`.
pub fn install<'js>(
    ctx: &Ctx<'js>,
    console: Console,
    input: InputReader,
    deadline: Deadline,
) -> rquickjs::Result<Hooks<'js>> {
    let prelude: Function<'js> = ctx.eval(PRELUDE)?;

    let emit = Function::new(ctx.clone(), move |channel: u32, line: String| {
        console.emit(channel, line);
    })?;

    let input = Mutex::new(input);
    let read = Function::new(ctx.clone(), move || -> Option<String> {
        input.lock().next_line().ok()
    })?;

    let now = Function::new(ctx.clone(), move || -> f64 { deadline.elapsed_ms() })?;

    let hooks: Object<'js> = prelude.call((emit, read, now))?;
    Ok(Hooks {
        tick: hooks.get("tick")?,
        watch: hooks.get("watch")?,
    })
}

/// A native callback that stores the main promise's settlement.
pub fn settlement_callback<'js>(
    ctx: &Ctx<'js>,
    settlement: Settlement,
) -> rquickjs::Result<Function<'js>> {
    Function::new(ctx.clone(), move |ok: bool, message: String| {
        *settlement.lock() = Some(if ok { Ok(()) } else { Err(message) });
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_stops_at_limit() {
        let console = Console::new(8);
        console.emit(CHANNEL_STDOUT, "abc".to_string());
        console.emit(CHANNEL_STDOUT, "defgh".to_string());
        console.emit(CHANNEL_STDOUT, "i".to_string());

        let outcome = console.snapshot(TerminalState::Completed);
        assert_eq!(outcome.stdout_lines, vec!["abc", TRUNCATION_MARKER]);
        assert!(outcome.stderr_lines.is_empty());
    }

    #[test]
    fn test_host_errors_survive_truncation() {
        let console = Console::new(4);
        console.emit(CHANNEL_FAULT, "too long".to_string());
        console.error("Script engine stopped unexpectedly");

        let outcome = console.snapshot(TerminalState::RuntimeError);
        assert!(console.faulted());
        assert_eq!(
            outcome.stderr_lines,
            vec!["Script engine stopped unexpectedly", TRUNCATION_MARKER]
        );
    }
}
