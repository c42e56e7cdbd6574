// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the web store.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use pwnstore_core::PwnstoreError;
use pwnstore_store::Engine;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// The same engine the CLI drives.
    pub engine: Engine,
    /// Budget for one install request.
    pub install_timeout: Duration,
    /// Budget for one uninstall request.
    pub uninstall_timeout: Duration,
    /// Budget for one configure request.
    pub configure_timeout: Duration,
}

/// Gateway server configuration (mirrors the `[gateway]` config section).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Every route lives under this prefix, e.g. `/plugins/pwnstore_ui`.
    pub path_prefix: String,
}

/// Builds the router. Routes, relative to `prefix`:
/// - GET `/` (store page)
/// - GET `/api/plugins`, GET `/api/installed`
/// - POST `/api/install`, `/api/uninstall`, `/api/configure`
///
/// Anything else is a plain 404.
pub fn build_router(prefix: &str, state: GatewayState) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let at = |path: &str| format!("{prefix}{path}");

    let mut router = Router::new()
        .route(&at("/"), get(handlers::index))
        .route(&at("/api/plugins"), get(handlers::get_plugins))
        .route(&at("/api/installed"), get(handlers::get_installed))
        .route(&at("/api/install"), post(handlers::post_install))
        .route(&at("/api/uninstall"), post(handlers::post_uninstall))
        .route(&at("/api/configure"), post(handlers::post_configure));
    if !prefix.is_empty() {
        router = router.route(prefix, get(handlers::index));
    }

    router
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the process ends.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), PwnstoreError> {
    let app = build_router(&config.path_prefix, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PwnstoreError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!(prefix = %config.path_prefix, "web store listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| PwnstoreError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
