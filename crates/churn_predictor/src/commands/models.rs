//! Models command - lists registered versions of a model.

use anyhow::Result;
use model_registry::ModelRegistry;
use tracing::info;

/// Runs the models command.
///
/// # Errors
///
/// Returns an error if the registry cannot be listed.
pub async fn run(registry: &ModelRegistry, model_name: &str) -> Result<()> {
    let manifests = registry.list_versions(model_name).await?;

    if manifests.is_empty() {
        info!(model_name, "No versions registered");
        return Ok(());
    }

    let production = registry.production_version(model_name).await.ok();

    info!(
        "{:<20} {:>8} {:<28} {:<10}",
        "Model", "Version", "Trained at", "Production"
    );
    info!("{}", "-".repeat(68));

    for manifest in manifests {
        let marker = if production == Some(manifest.version) {
            "yes"
        } else {
            ""
        };

        info!(
            "{:<20} {:>8} {:<28} {:<10}",
            manifest.name,
            manifest.version,
            manifest.created_at.to_rfc3339(),
            marker
        );
    }

    Ok(())
}
