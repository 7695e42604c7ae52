//! HTTP serving layer for churn predictions.
//!
//! Stateless by design: every prediction request reloads whichever model
//! version is currently marked production in the registry.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use model_registry::ModelRegistry;
use tower_http::trace::TraceLayer;
use tracing::info;

mod routes;

pub use routes::{ModelInfoResponse, PredictRequest, PredictionResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry the production model is loaded from on every request.
    pub registry: Arc<ModelRegistry>,
    /// Registered model name to serve.
    pub model_name: String,
}

/// Builds the API router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/predict", post(routes::predict))
        .route("/model/info", get(routes::model_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves the API until shutdown.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Serving churn prediction API");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
