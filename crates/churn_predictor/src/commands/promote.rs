//! Promote command - marks a model version as production.

use anyhow::{Context, Result};
use model_registry::ModelRegistry;
use tracing::info;

/// Runs the promote command.
///
/// Promotes the given version, or the latest registered version when none
/// is specified.
///
/// # Errors
///
/// Returns an error if no version exists or the promotion fails.
pub async fn run(
    registry: &ModelRegistry,
    model_name: &str,
    version: Option<u32>,
) -> Result<()> {
    let version = match version {
        Some(version) => version,
        None => registry
            .latest_version(model_name)
            .await?
            .with_context(|| format!("No versions registered for '{model_name}'"))?,
    };

    registry.promote(model_name, version).await?;

    info!(model_name, version, "Promoted model to production");

    Ok(())
}
