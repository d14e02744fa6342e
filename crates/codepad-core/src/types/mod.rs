//! Core types for Codepad.

mod language;
mod execution;

pub use language::*;
pub use execution::*;
