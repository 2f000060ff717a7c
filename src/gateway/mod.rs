//! HTTP gateway: maps `/sessions` routes onto the session registry.

pub mod api;

use crate::config::{Config, GatewayConfig};
use crate::sessions::{create_session_store, SessionStore};
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            started_at: Instant::now(),
        }
    }
}

/// Build the gateway router with body-size and timeout limits from `config`.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/health", get(api::handle_health))
        .route("/sessions", post(api::handle_create_session))
        .route("/sessions/{id}", get(api::handle_view_session))
        .route("/sessions/{id}/join", post(api::handle_join_session))
        .fallback(api::handle_not_found)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let store = create_session_store(&config.sessions);
    let app = build_router(AppState::new(store), &config.gateway);

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind gateway to {host}:{port}"))?;
    let addr = listener
        .local_addr()
        .context("Failed to read gateway listen address")?;
    tracing::info!(%addr, "Gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
    }
    tracing::info!("Shutdown signal received");
}
