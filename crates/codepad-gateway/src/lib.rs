//! HTTP gateway for Codepad.
//!
//! This crate provides:
//! - `POST /api/run`: execute a snippet and return the normalized result
//! - `GET /health`: liveness and version

pub mod api;
pub mod error;
pub mod server;

pub use api::{HealthResponse, RunPayload};
pub use error::GatewayError;
pub use server::{AppState, Gateway};

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
