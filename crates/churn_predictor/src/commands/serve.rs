//! Serve command - starts the prediction API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use churn_api::AppState;
use model_registry::ModelRegistry;

/// Runs the serve command.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run(
    registry: ModelRegistry,
    model_name: &str,
    bind: Option<SocketAddr>,
) -> Result<()> {
    let addr = bind.unwrap_or(config::CONFIG.bind_addr);

    let state = AppState {
        registry: Arc::new(registry),
        model_name: model_name.to_string(),
    };

    churn_api::serve(addr, state).await
}
