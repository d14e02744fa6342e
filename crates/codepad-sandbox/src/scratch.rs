//! Per-run scratch directories.
//!
//! Every run gets a uniquely named directory under the scratch root. The
//! handle deletes it on drop; [`ScratchDir::release`] does the same but
//! reports failures to the log.

use crate::error::SandboxError;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const PREFIX: &str = "codepad-";

/// Where scratch paths are allocated.
#[derive(Debug, Clone)]
pub struct ScratchArea {
    root: PathBuf,
}

impl Default for ScratchArea {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir(),
        }
    }
}

impl ScratchArea {
    /// Allocate under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Allocate under `root` when given, otherwise under the OS temp dir.
    pub fn from_option(root: Option<&Path>) -> Self {
        root.map(Self::new).unwrap_or_default()
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `code` to `file_name` inside a fresh uniquely named directory.
    pub fn materialize_dir(&self, file_name: &str, code: &str) -> Result<ScratchDir> {
        fs::create_dir_all(&self.root).map_err(SandboxError::Scratch)?;
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(&self.root)
            .map_err(SandboxError::Scratch)?;
        fs::write(dir.path().join(file_name), code)?;
        debug!("Materialized {} in {}", file_name, dir.path().display());
        Ok(ScratchDir { dir })
    }
}

/// A scratch directory, removed with its contents when released or dropped.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Path of the directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory. Failures are logged, never returned.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("Failed to remove scratch directory {}: {}", path.display(), e);
        }
    }
}
