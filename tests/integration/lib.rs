//! Shared helpers for the integration tests.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Whether `program` can be launched from `PATH`.
///
/// Tests that need a real language toolchain skip themselves when it is
/// missing.
pub fn has_binary(program: &str, version_flag: &str) -> bool {
    Command::new(program)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Path of the compiled `codepad` binary, if it has been built.
pub fn codepad_bin() -> Option<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir.parent()?.parent()?;
    let bin = workspace_root.join("target").join("debug").join("codepad");
    bin.exists().then_some(bin)
}

/// Skip the current test with a note when `$cond` is false.
#[macro_export]
macro_rules! require {
    ($cond:expr, $why:expr) => {
        if !$cond {
            eprintln!("skipping: {}", $why);
            return;
        }
    };
}
