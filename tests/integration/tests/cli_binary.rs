//! Tests against the compiled `codepad` binary.
//!
//! Each test skips itself when the binary has not been built yet.

use codepad_integration_tests::{codepad_bin, require};
use std::process::Command;
use tempfile::TempDir;

fn codepad_cmd(home: &TempDir) -> Option<Command> {
    let mut cmd = Command::new(codepad_bin()?);
    cmd.env("CODEPAD_HOME", home.path()).env_remove("CODEPAD_CONFIG");
    Some(cmd)
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let cmd = codepad_cmd(&home);
    require!(cmd.is_some(), "codepad binary not built");
    let output = cmd.unwrap().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"), "help should mention serve, got: {}", stdout);
    assert!(stdout.contains("run"), "help should mention run, got: {}", stdout);
}

#[test]
fn test_cli_unknown_command() {
    let home = TempDir::new().unwrap();
    let cmd = codepad_cmd(&home);
    require!(cmd.is_some(), "codepad binary not built");
    let output = cmd.unwrap().arg("nonexistent-command").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_cli_run_javascript() {
    let home = TempDir::new().unwrap();
    let cmd = codepad_cmd(&home);
    require!(cmd.is_some(), "codepad binary not built");

    let file = home.path().join("hello.js");
    std::fs::write(&file, "console.log('hello'); console.error('oops');").unwrap();

    let output = cmd.unwrap().arg("run").arg(&file).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    assert!(String::from_utf8_lossy(&output.stderr).contains("oops"));
}

#[test]
fn test_cli_run_failure_exit_code() {
    let home = TempDir::new().unwrap();
    let cmd = codepad_cmd(&home);
    require!(cmd.is_some(), "codepad binary not built");

    let file = home.path().join("boom.js");
    std::fs::write(&file, "throw new Error('boom')").unwrap();

    let output = cmd.unwrap().args(["run", "--json"]).arg(&file).output().unwrap();
    assert!(!output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["terminalState"], "runtimeError");
    assert_eq!(body["errors"], serde_json::json!(["boom"]));
}

#[test]
fn test_cli_config_path_uses_home() {
    let home = TempDir::new().unwrap();
    let cmd = codepad_cmd(&home);
    require!(cmd.is_some(), "codepad binary not built");

    let output = cmd.unwrap().args(["config", "path"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().ends_with("codepad.json5"));
    assert!(stdout.contains(&*home.path().to_string_lossy()));
}
