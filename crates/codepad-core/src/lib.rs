//! # codepad-core
//!
//! Core types, configuration, and utilities for Codepad.
//!
//! This crate provides shared functionality used across all Codepad crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the JSON5 config file
//! - **Types**: Execution requests, results, languages, and terminal states
//! - **Utilities**: Path resolution and environment handling

pub mod config;
pub mod types;
pub mod error;
pub mod paths;
pub mod env;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
