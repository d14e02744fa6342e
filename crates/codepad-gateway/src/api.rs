//! HTTP handlers.

use crate::error::GatewayError;
use crate::server::AppState;
use crate::Result;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use codepad_core::{ExecutionRequest, ExecutionResult, Language};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Body of `POST /api/run`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunPayload {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub input: String,

    /// Language name or alias.
    #[serde(default)]
    pub language: Option<String>,

    /// Source path, used to infer the language.
    #[serde(default)]
    pub path: Option<String>,
}

impl RunPayload {
    /// Parse a raw body. An empty body is an empty payload.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// Convert into an engine request.
    pub fn into_request(self) -> Result<ExecutionRequest> {
        let mut request = ExecutionRequest::new(self.code).with_input(self.input);

        if let Some(language) = self.language.filter(|l| !l.trim().is_empty()) {
            request = request.with_language(language.parse::<Language>()?);
        }
        if let Some(path) = self.path.filter(|p| !p.is_empty()) {
            request = request.with_source_path(path);
        }

        Ok(request)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /api/run`.
pub async fn run_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<Json<ExecutionResult>, GatewayError> {
    let request = RunPayload::from_body(&body?)?.into_request()?;
    debug!("Run request: {} bytes of code", request.code.len());

    let result = state.engine.execute(request).await;
    Ok(Json(result))
}

/// `GET /health`.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
