//! HTTP gateway server.

use crate::api::{health_handler, run_handler};
use crate::error::GatewayError;
use crate::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use codepad_core::config::{BindMode, GatewayConfig};
use codepad_core::Config;
use codepad_sandbox::ExecutionEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared handler state.
pub struct AppState {
    /// Engine shared by all requests.
    pub engine: ExecutionEngine,
}

/// The HTTP gateway.
pub struct Gateway {
    config: GatewayConfig,
    state: Arc<AppState>,
}

impl Gateway {
    /// Create a new gateway around an engine.
    pub fn new(config: GatewayConfig, engine: ExecutionEngine) -> Self {
        Self {
            config,
            state: Arc::new(AppState { engine }),
        }
    }

    /// Create a gateway and its engine from a full config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gateway.clone(), ExecutionEngine::from_config(config))
    }

    /// Gateway settings.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the gateway server.
    pub async fn run(&self) -> Result<()> {
        let addr = self.bind_address();

        if self.config.bind != BindMode::Loopback {
            warn!("Gateway binding to {}; submitted code runs on this host", addr);
        }

        let app = self.router();

        info!("Starting gateway server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(GatewayError::Io)?;

        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Create the Axum router.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/api/run", post(run_handler))
            .route("/health", get(health_handler))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone());

        if self.config.cors {
            router = router.layer(Self::create_cors_layer());
        }

        router
    }

    fn create_cors_layer() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    }

    /// Get the bind address.
    pub fn bind_address(&self) -> SocketAddr {
        let ip = match self.config.bind {
            BindMode::Loopback => [127, 0, 0, 1],
            BindMode::Lan => [0, 0, 0, 0],
        };

        SocketAddr::from((ip, self.config.port))
    }
}
