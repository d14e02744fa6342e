//! Subprocess-backed execution.
//!
//! Source is written to scratch space, optionally compiled, then run as a
//! child process. Stdin is written in one go and closed; stdout and stderr are
//! drained continuously by a supervised task group while the child's exit
//! races a wall-clock timer. On expiry the child is killed without a grace
//! period. On unix the child leads its own process group, and the group is
//! killed once the child has ended, however it ended.

use crate::error::SandboxError;
use crate::executor::Executor;
use crate::input::InputFeed;
use crate::normalize::{GENERIC_FAILURE_MESSAGE, TRUNCATION_MARKER};
use crate::outcome::ExecutionOutcome;
use crate::scratch::ScratchArea;
use async_trait::async_trait;
use codepad_core::config::{ExecutionConfig, JavaConfig, PythonConfig};
use codepad_core::TerminalState;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

/// How long stream drains may keep reading after the child has ended.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Run a source file with an interpreter.
#[derive(Debug, Clone)]
pub struct InterpretStrategy {
    /// Interpreter binary.
    pub interpreter: String,

    /// Name of the source file inside the run's scratch directory.
    pub source_file: String,

    /// Extra environment for the interpreter.
    pub env: Vec<(String, String)>,

    /// Wall-clock bound for the interpreter.
    pub timeout: Duration,
}

/// Compile a source file, then run the produced entry point.
#[derive(Debug, Clone)]
pub struct CompileStrategy {
    /// Compiler binary.
    pub compiler: String,

    /// Arguments placed before the source file name.
    pub compiler_args: Vec<String>,

    /// Runtime binary.
    pub runtime: String,

    /// Arguments placed before the class path and entry name.
    pub runtime_args: Vec<String>,

    /// Required name of the source file.
    pub source_file: String,

    /// Entry symbol passed to the runtime; `<entry>.class` must exist after compiling.
    pub entry: String,

    /// Wall-clock bound for the compiler.
    pub compile_timeout: Duration,

    /// Wall-clock bound for the compiled program.
    pub run_timeout: Duration,
}

/// Strategy used by a [`ProcessExecutor`].
#[derive(Debug, Clone)]
pub enum LanguageStrategy {
    Interpret(InterpretStrategy),
    CompileThenRun(CompileStrategy),
}

impl LanguageStrategy {
    /// Python through its interpreter.
    pub fn python(config: &PythonConfig) -> Self {
        Self::Interpret(InterpretStrategy {
            interpreter: config.interpreter.clone(),
            source_file: "main.py".to_string(),
            env: vec![
                ("PYTHONUNBUFFERED".to_string(), "1".to_string()),
                ("PYTHONDONTWRITEBYTECODE".to_string(), "1".to_string()),
                ("PYTHONIOENCODING".to_string(), "utf-8".to_string()),
            ],
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// Java through `javac` and `java`.
    pub fn java(config: &JavaConfig) -> Self {
        Self::CompileThenRun(CompileStrategy {
            compiler: config.compiler.clone(),
            compiler_args: vec!["-encoding".to_string(), "UTF-8".to_string()],
            runtime: config.runtime.clone(),
            runtime_args: vec!["-XX:+UseSerialGC".to_string()],
            source_file: "Main.java".to_string(),
            entry: "Main".to_string(),
            compile_timeout: Duration::from_millis(config.compile_timeout_ms),
            run_timeout: Duration::from_millis(config.run_timeout_ms),
        })
    }
}

/// Executor for subprocess-backed languages.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    strategy: LanguageStrategy,
    scratch: ScratchArea,
    max_output_bytes: usize,
}

impl ProcessExecutor {
    /// Create a new executor.
    pub fn new(strategy: LanguageStrategy, scratch: ScratchArea) -> Self {
        Self {
            strategy,
            scratch,
            max_output_bytes: 1024 * 1024, // 1 MiB default
        }
    }

    /// Python executor from the engine configuration.
    pub fn python(config: &ExecutionConfig) -> Self {
        Self::new(
            LanguageStrategy::python(&config.python),
            ScratchArea::from_option(config.scratch_dir.as_deref()),
        )
        .with_max_output_size(config.max_output_bytes)
    }

    /// Java executor from the engine configuration.
    pub fn java(config: &ExecutionConfig) -> Self {
        Self::new(
            LanguageStrategy::java(&config.java),
            ScratchArea::from_option(config.scratch_dir.as_deref()),
        )
        .with_max_output_size(config.max_output_bytes)
    }

    /// Set maximum captured size per stream.
    pub fn with_max_output_size(mut self, size: usize) -> Self {
        self.max_output_bytes = size;
        self
    }

    async fn interpret(
        &self,
        strategy: &InterpretStrategy,
        code: &str,
        input: &InputFeed,
    ) -> ExecutionOutcome {
        // A directory per run: interpreters put the script's directory on
        // their import path, so nothing else may live next to the source.
        let workdir = match self.scratch.materialize_dir(&strategy.source_file, code) {
            Ok(workdir) => workdir,
            Err(e) => return ExecutionOutcome::failure(TerminalState::SpawnFailed, e.to_string()),
        };

        let run = self
            .supervise(Launch {
                program: &strategy.interpreter,
                args: vec![OsString::from(&strategy.source_file)],
                cwd: workdir.path(),
                env: &strategy.env,
                stdin: input.to_stdin(),
                timeout: strategy.timeout,
            })
            .await;

        workdir.release();
        run.into_outcome()
    }

    async fn compile_then_run(
        &self,
        strategy: &CompileStrategy,
        code: &str,
        input: &InputFeed,
    ) -> ExecutionOutcome {
        let workdir = match self.scratch.materialize_dir(&strategy.source_file, code) {
            Ok(workdir) => workdir,
            Err(e) => return ExecutionOutcome::failure(TerminalState::SpawnFailed, e.to_string()),
        };

        let mut compiler_args: Vec<OsString> =
            strategy.compiler_args.iter().map(OsString::from).collect();
        compiler_args.push(OsString::from(&strategy.source_file));

        let compile = self
            .supervise(Launch {
                program: &strategy.compiler,
                args: compiler_args,
                cwd: workdir.path(),
                env: &[],
                stdin: String::new(),
                timeout: strategy.compile_timeout,
            })
            .await;

        match &compile.end {
            ProcessEnd::Exited(status) if status.success() => {}
            ProcessEnd::Exited(status) => {
                debug!("Compilation failed with {}", status);
                workdir.release();
                return ExecutionOutcome::failure(TerminalState::CompileFailed, compile.diagnostic());
            }
            _ => {
                workdir.release();
                return compile.into_outcome();
            }
        }

        let artifact = workdir.path().join(format!("{}.class", strategy.entry));
        if !artifact.exists() {
            workdir.release();
            return ExecutionOutcome::failure(
                TerminalState::CompileFailed,
                format!(
                    "{} does not declare an entry class named `{}`",
                    strategy.source_file, strategy.entry
                ),
            );
        }

        let mut runtime_args: Vec<OsString> =
            strategy.runtime_args.iter().map(OsString::from).collect();
        runtime_args.push(OsString::from("-cp"));
        runtime_args.push(workdir.path().as_os_str().to_owned());
        runtime_args.push(OsString::from(&strategy.entry));

        let run = self
            .supervise(Launch {
                program: &strategy.runtime,
                args: runtime_args,
                cwd: workdir.path(),
                env: &[],
                stdin: input.to_stdin(),
                timeout: strategy.run_timeout,
            })
            .await;

        workdir.release();
        run.into_outcome()
    }

    /// Spawn a child and supervise it until exactly one terminal event.
    async fn supervise(&self, launch: Launch<'_>) -> SupervisedRun {
        debug!("Spawning {} {:?}", launch.program, launch.args);

        let mut cmd = Command::new(launch.program);
        cmd.args(&launch.args)
            .current_dir(launch.cwd)
            .env_clear()
            .envs(codepad_core::env::child_env())
            .envs(launch.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a kill reaches anything the program forks.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return SupervisedRun::spawn_failed(SandboxError::spawn(launch.program, e)),
        };
        // The group id equals the leader's pid, which is gone once reaped.
        let group = child.id();

        let stdout = Capture::new(self.max_output_bytes);
        let stderr = Capture::new(self.max_output_bytes);
        let mut tasks = JoinSet::new();

        if let Some(mut pipe) = child.stdin.take() {
            let input = launch.stdin;
            tasks.spawn(async move {
                if let Err(e) = pipe.write_all(input.as_bytes()).await {
                    debug!("Child stopped reading stdin: {}", e);
                }
                // Dropping the pipe closes the child's stdin.
            });
        }
        if let Some(pipe) = child.stdout.take() {
            tasks.spawn(drain(pipe, stdout.clone()));
        }
        if let Some(pipe) = child.stderr.take() {
            tasks.spawn(drain(pipe, stderr.clone()));
        }

        let end = match timeout(launch.timeout, child.wait()).await {
            Ok(Ok(status)) => ProcessEnd::Exited(status),
            Ok(Err(e)) => ProcessEnd::WaitFailed(e),
            Err(_) => {
                warn!("Killing {} after {:?}", launch.program, launch.timeout);
                if let Err(e) = child.kill().await {
                    debug!("Failed to kill process: {}", e);
                }
                ProcessEnd::Killed
            }
        };

        // Whatever the program left running in the background dies with it.
        kill_group(group);

        // Bytes already in the pipes predate the terminal event; collect them,
        // then stop whatever is left.
        let _ = timeout(DRAIN_GRACE, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;
        tasks.shutdown().await;

        SupervisedRun {
            stdout: stdout.text(),
            stderr: stderr.text(),
            end,
        }
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    fn name(&self) -> &'static str {
        match self.strategy {
            LanguageStrategy::Interpret(_) => "interpret",
            LanguageStrategy::CompileThenRun(_) => "compile-then-run",
        }
    }

    async fn run(&self, code: &str, input: &InputFeed) -> ExecutionOutcome {
        match &self.strategy {
            LanguageStrategy::Interpret(strategy) => self.interpret(strategy, code, input).await,
            LanguageStrategy::CompileThenRun(strategy) => {
                self.compile_then_run(strategy, code, input).await
            }
        }
    }
}

/// Everything needed to launch one child.
struct Launch<'a> {
    program: &'a str,
    args: Vec<OsString>,
    cwd: &'a Path,
    env: &'a [(String, String)],
    stdin: String,
    timeout: Duration,
}

/// The single terminal event of a supervised child.
#[derive(Debug)]
enum ProcessEnd {
    Exited(ExitStatus),
    Killed,
    SpawnFailed(SandboxError),
    WaitFailed(std::io::Error),
}

/// Captured streams plus the terminal event.
#[derive(Debug)]
struct SupervisedRun {
    stdout: String,
    stderr: String,
    end: ProcessEnd,
}

impl SupervisedRun {
    fn spawn_failed(error: SandboxError) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            end: ProcessEnd::SpawnFailed(error),
        }
    }

    /// Compiler diagnostics as a single line.
    fn diagnostic(&self) -> String {
        [self.stderr.trim_end(), self.stdout.trim_end()]
            .into_iter()
            .find(|text| !text.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
    }

    fn into_outcome(self) -> ExecutionOutcome {
        let (state, extra) = match self.end {
            ProcessEnd::Exited(status) if status.success() => (TerminalState::Completed, None),
            ProcessEnd::Exited(status) => {
                debug!("Process exited with {}", status);
                (TerminalState::RuntimeError, None)
            }
            ProcessEnd::Killed => (TerminalState::TimedOut, None),
            ProcessEnd::SpawnFailed(e) => (TerminalState::SpawnFailed, Some(e.to_string())),
            ProcessEnd::WaitFailed(e) => (
                TerminalState::RuntimeError,
                Some(format!("Failed to wait for process: {}", e)),
            ),
        };

        let mut outcome = ExecutionOutcome::from_streams(&self.stdout, &self.stderr, state);
        outcome.stderr_lines.extend(extra);
        outcome
    }
}

/// SIGKILL every process left in the child's group.
#[cfg(unix)]
fn kill_group(group: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pgid) = group else { return };
    match killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL) {
        Ok(()) => debug!("Killed leftover processes in group {}", pgid),
        // Empty group: nothing was left behind.
        Err(Errno::ESRCH) => {}
        Err(e) => debug!("Failed to kill process group {}: {}", pgid, e),
    }
}

#[cfg(not(unix))]
fn kill_group(_group: Option<u32>) {}

/// Bounded, shared byte buffer for one output stream.
#[derive(Debug, Clone)]
struct Capture {
    inner: Arc<Mutex<CaptureBuffer>>,
}

#[derive(Debug, Default)]
struct CaptureBuffer {
    bytes: Vec<u8>,
    limit: usize,
    truncated: bool,
}

impl Capture {
    fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CaptureBuffer {
                limit,
                ..Default::default()
            })),
        }
    }

    fn append(&self, chunk: &[u8]) {
        let mut buffer = self.inner.lock();
        let room = buffer.limit.saturating_sub(buffer.bytes.len());
        if chunk.len() > room {
            buffer.truncated = true;
        }
        let take = chunk.len().min(room);
        buffer.bytes.extend_from_slice(&chunk[..take]);
    }

    fn text(&self) -> String {
        let buffer = self.inner.lock();
        let mut text = String::from_utf8_lossy(&buffer.bytes).into_owned();
        if buffer.truncated {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(TRUNCATION_MARKER);
        }
        text
    }
}

/// Read a stream to EOF, keeping what fits in the capture.
async fn drain(mut reader: impl AsyncRead + Unpin, sink: Capture) {
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break, // EOF
            Ok(n) => sink.append(&chunk[..n]),
            Err(e) => {
                warn!("Error reading stream: {}", e);
                break;
            }
        }
    }
}
