//! Configuration loading, validation, and persistence.

mod schema;
mod loader;

pub use schema::*;
pub use loader::*;
