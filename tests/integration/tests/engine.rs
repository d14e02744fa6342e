//! End-to-end engine tests across all three execution families.
//!
//! Python and Java cases need real toolchains on `PATH` and skip themselves
//! otherwise.

use codepad_core::config::ExecutionConfig;
use codepad_core::{ExecutionRequest, Language, TerminalState};
use codepad_integration_tests::{has_binary, require};
use codepad_sandbox::ExecutionEngine;
use std::time::{Duration, Instant};

fn engine() -> ExecutionEngine {
    ExecutionEngine::new(ExecutionConfig::default())
}

fn has_python() -> bool {
    has_binary("python3", "--version")
}

fn has_java() -> bool {
    has_binary("javac", "-version") && has_binary("java", "-version")
}

#[tokio::test]
async fn test_javascript_reads_input() {
    let request = ExecutionRequest::new(
        r#"
        const a = Number(getInput());
        const b = Number(getInput());
        console.log(a + b);
        "#,
    )
    .with_input("2\n40\n");

    let result = engine().execute(request).await;
    assert_eq!(result.terminal_state, TerminalState::Completed);
    assert_eq!(result.logs, vec!["42"]);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_javascript_timeout_is_bounded() {
    let started = Instant::now();
    let result = engine()
        .execute(ExecutionRequest::new("for (;;) {}"))
        .await;

    assert_eq!(result.terminal_state, TerminalState::TimedOut);
    assert_eq!(result.errors, vec!["Execution timeout"]);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_missing_runtime_reports_spawn_failure() {
    let mut config = ExecutionConfig::default();
    config.python.interpreter = "/nonexistent/python3".to_string();
    let engine = ExecutionEngine::new(config);

    let result = engine
        .execute(ExecutionRequest::new("print(1)").with_language(Language::Python))
        .await;

    assert_eq!(result.terminal_state, TerminalState::SpawnFailed);
    assert_eq!(result.language, "python");
    assert!(!result.errors.is_empty());
}

#[tokio::test]
async fn test_python_echo_input() {
    require!(has_python(), "python3 not installed");

    let request = ExecutionRequest::new("name = input()\nprint(f'Hello, {name}!')")
        .with_input("Ada")
        .with_language(Language::Python);

    let result = engine().execute(request).await;
    assert_eq!(result.terminal_state, TerminalState::Completed);
    assert_eq!(result.logs, vec!["Hello, Ada!"]);
}

#[tokio::test]
async fn test_python_exception_is_runtime_error() {
    require!(has_python(), "python3 not installed");

    let request = ExecutionRequest::new("print('before')\nraise ValueError('bad value')")
        .with_source_path("main.py");

    let result = engine().execute(request).await;
    assert_eq!(result.terminal_state, TerminalState::RuntimeError);
    assert_eq!(result.logs, vec!["before"]);
    assert!(result.errors.iter().any(|line| line.contains("ValueError: bad value")));
}

#[tokio::test]
async fn test_python_infinite_loop_times_out() {
    require!(has_python(), "python3 not installed");

    let started = Instant::now();
    let request = ExecutionRequest::new("print('tick', flush=True)\nwhile True:\n    pass")
        .with_language(Language::Python);

    let result = engine().execute(request).await;
    assert_eq!(result.terminal_state, TerminalState::TimedOut);
    assert_eq!(result.logs, vec!["tick"]);
    assert!(result.errors.contains(&"Execution timeout".to_string()));
    assert!(started.elapsed() < Duration::from_secs(6));
}

#[tokio::test]
async fn test_java_compile_and_run() {
    require!(has_java(), "JDK not installed");

    let code = r#"
import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        int total = 0;
        while (in.hasNextInt()) {
            total += in.nextInt();
        }
        System.out.println("sum=" + total);
    }
}
"#;
    let request = ExecutionRequest::new(code)
        .with_input("1\n2\n3")
        .with_language(Language::Java);

    let result = engine().execute(request).await;
    assert_eq!(result.terminal_state, TerminalState::Completed, "{:?}", result.errors);
    assert_eq!(result.logs, vec!["sum=6"]);
}

#[tokio::test]
async fn test_java_compile_error() {
    require!(has_java(), "JDK not installed");

    let request = ExecutionRequest::new("public class Main { void broken( }")
        .with_language(Language::Java);

    let result = engine().execute(request).await;
    assert_eq!(result.terminal_state, TerminalState::CompileFailed);
    assert_eq!(result.errors.len(), 1);
    assert!(result.logs.is_empty());
}

#[tokio::test]
async fn test_concurrent_javascript_runs_do_not_interfere() {
    let engine = engine();
    let slow = ExecutionRequest::new("while (true) {}");
    let fast = ExecutionRequest::new("console.log(getInput())").with_input("quick");

    let started = Instant::now();
    let (slow, fast) = futures::join!(engine.execute(slow), engine.execute(fast));

    assert_eq!(slow.terminal_state, TerminalState::TimedOut);
    assert_eq!(fast.logs, vec!["quick"]);
    assert!(fast.duration_ms < slow.duration_ms);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_hanging_python_does_not_delay_javascript() {
    require!(has_python(), "python3 not installed");

    let mut config = ExecutionConfig::default();
    config.python.timeout_ms = 2000;
    let engine = ExecutionEngine::new(config);

    let slow = ExecutionRequest::new("import time\nprint('started', flush=True)\ntime.sleep(30)")
        .with_language(Language::Python);
    let fast = ExecutionRequest::new("console.log(getInput())").with_input("quick");

    let started = Instant::now();
    let (slow, fast) = futures::join!(engine.execute(slow), engine.execute(fast));

    assert_eq!(slow.terminal_state, TerminalState::TimedOut);
    assert_eq!(slow.logs, vec!["started"]);
    assert_eq!(fast.logs, vec!["quick"]);
    assert!(fast.duration_ms < slow.duration_ms);
    assert!(started.elapsed() < Duration::from_secs(5));
}
