// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, the permissive CORS layer, and shared state.

use std::sync::Arc;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use cupflow_core::{AdminNotifier, CupflowError};
use cupflow_storage::Database;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Application store handle.
    pub db: Database,
    /// Push-notification path into the admin console.
    pub notifier: Arc<dyn AdminNotifier>,
}

/// Gateway server configuration (mirrors `GatewayConfig` from
/// cupflow-config to avoid a config-crate dependency here).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Assemble the gateway router.
///
/// The intake form is served from arbitrary origins, so CORS allows any
/// origin with the standard method set; preflight OPTIONS is answered by the
/// layer with a bare 200.
pub fn build_router(state: GatewayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/test", get(handlers::get_test))
        .route("/api/submit", post(handlers::post_submit))
        .route("/api/applications", get(handlers::get_applications))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the gateway until the listener fails.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), CupflowError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CupflowError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| CupflowError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
