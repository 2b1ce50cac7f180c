//! HTTP proxy in front of the recipe service.
//!
//! The terminal client never talks to the backend directly. These handlers
//! validate the request, forward it upstream and shape the reply:
//!
//! - `POST /api/process-recipe` returns the backend body verbatim
//! - `POST /api/chat` returns `{"data": <backend body>}`
//! - `GET /api/health` returns `{"status": "ok"}`
//!
//! Failures are reported as `{"error": "..."}` with status 400 or 500.

pub mod backend;
pub mod error;
pub mod routes;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use backend::BackendClient;
pub use routes::{ChatRequest, ProcessRecipeRequest};

#[derive(Debug, Clone)]
pub struct ProxyState {
    backend: BackendClient,
}

pub fn router(backend: BackendClient) -> Router {
    Router::new()
        .route("/api/process-recipe", post(routes::process_recipe))
        .route("/api/chat", post(routes::chat))
        .route("/api/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(ProxyState { backend })
}

pub async fn bind(listen_addr: &str) -> Result<TcpListener> {
    TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind proxy to {listen_addr}"))
}

pub async fn serve(listener: TcpListener, backend: BackendClient) -> Result<()> {
    info!(
        addr = %listener.local_addr().context("Failed to read listener address")?,
        backend = backend.base_url(),
        "Recipe proxy listening"
    );

    axum::serve(listener, router(backend))
        .await
        .context("Proxy server stopped unexpectedly")?;

    Ok(())
}
