//! Config save/load roundtrip integration tests.

use codepad_core::config::{BindMode, Config, ConfigBuilder};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codepad.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, config.gateway.port);
    assert_eq!(loaded.gateway.bind, config.gateway.bind);
    assert_eq!(
        loaded.execution.javascript.outer_timeout_ms,
        config.execution.javascript.outer_timeout_ms
    );
    assert_eq!(loaded.execution.java.compiler, config.execution.java.compiler);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codepad.json5");

    let config = ConfigBuilder::new()
        .port(9090)
        .bind(BindMode::Lan)
        .python_interpreter("/usr/bin/python3.12")
        .build();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, 9090);
    assert_eq!(loaded.gateway.bind, BindMode::Lan);
    assert_eq!(loaded.execution.python.interpreter, "/usr/bin/python3.12");
}

#[test]
fn test_partial_json5_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codepad.json5");
    std::fs::write(
        &path,
        r#"{
          // only override what matters
          execution: { java: { run_timeout_ms: 8000 } },
        }"#,
    )
    .unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.execution.java.run_timeout_ms, 8000);
    assert_eq!(loaded.execution.java.compile_timeout_ms, 3000);
    assert_eq!(loaded.gateway.port, 3000);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_invalid_values_fail_validation() {
    let config = Config::parse("{ execution: { javascript: { sync_timeout_ms: 2000, outer_timeout_ms: 1000 } } }")
        .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/codepad.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
