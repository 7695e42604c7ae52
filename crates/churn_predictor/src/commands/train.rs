//! Train command - runs the two-step training pipeline once.
//!
//! Step 1 fabricates the training table, step 2 fits the classifier,
//! evaluates it on a held-out split and registers the result as a new
//! model version.

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::Utc;
use churn_model::{prepare_training_data, ChurnDataset, GbdtConfig};
use model_registry::{ModelManifest, ModelRegistry};
use tracing::info;

/// Seed for the train/test split.
const SPLIT_SEED: u64 = 42;

/// Fraction of rows held out for evaluation.
const TEST_RATIO: f64 = 0.2;

/// Runs the train command.
///
/// # Errors
///
/// Returns an error if training or registration fails.
pub async fn run(registry: &ModelRegistry, model_name: &str) -> Result<()> {
    info!(model_name, "Starting training pipeline");

    // Step 1: prepare data
    let data = prepare_training_data();
    info!(rows = data.len(), "Prepared training table");

    // Step 2: train model
    let manifest = train_model(registry, model_name, &data).await?;

    info!(
        model_name,
        version = manifest.version,
        "Training pipeline complete"
    );

    Ok(())
}

/// Fits the classifier on the prepared table and registers a new version.
///
/// # Errors
///
/// Returns an error if the table is empty, training fails, or the registry
/// write fails.
pub async fn train_model(
    registry: &ModelRegistry,
    model_name: &str,
    data: &ChurnDataset,
) -> Result<ModelManifest> {
    if data.is_empty() {
        anyhow::bail!("No training data found");
    }

    let (train_set, test_set) = data.split(TEST_RATIO, SPLIT_SEED);
    info!(
        train_rows = train_set.len(),
        test_rows = test_set.len(),
        "Split training table"
    );

    let config = GbdtConfig::default();
    info!(
        objective = config.objective,
        num_rounds = config.num_rounds,
        max_depth = config.max_depth,
        "Training model"
    );

    let forest = churn_model::train(&train_set, &config)?;

    let probabilities: Vec<f32> = test_set
        .features
        .iter()
        .map(|features| forest.predict_proba(features))
        .collect();
    let metrics = churn_model::evaluate(&probabilities, &test_set.labels);

    info!(
        accuracy = metrics.accuracy,
        precision = metrics.precision,
        recall = metrics.recall,
        f1 = metrics.f1,
        "Evaluated held-out split"
    );

    let version = registry.next_version(model_name).await?;

    let manifest = ModelManifest {
        name: model_name.to_string(),
        version,
        created_at: Utc::now(),
        model_kind: churn_model::MODEL_KIND.to_string(),
        signature: serde_json::to_value(churn_model::signature())
            .context("Failed to serialize model signature")?,
        params: serde_json::to_value(&config).context("Failed to serialize training params")?,
        metrics: serde_json::to_value(metrics).context("Failed to serialize metrics")?,
    };

    let artifact =
        serde_json::to_vec(&forest).context("Failed to serialize model artifact")?;

    registry.save_version(&manifest, Bytes::from(artifact)).await?;

    Ok(manifest)
}
