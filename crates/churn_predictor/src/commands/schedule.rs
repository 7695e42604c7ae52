//! Schedule command - runs the training pipeline on a fixed interval.
//!
//! Each run gets a single retry after a short delay; a run that still
//! fails is logged and the schedule keeps going.

use core::time::Duration;

use anyhow::Result;
use backon::{ConstantBuilder, Retryable};
use chrono::Utc;
use model_registry::ModelRegistry;
use tracing::{error, info};

use super::train;

/// Delay before the single retry of a failed run.
const RETRY_DELAY: Duration = Duration::from_secs(5 * 60);

/// Runs the schedule command. Never returns under normal operation.
///
/// # Errors
///
/// Returns an error if the interval cannot be represented.
pub async fn run(registry: &ModelRegistry, model_name: &str, interval_hours: u64) -> Result<()> {
    let interval = Duration::from_secs(interval_hours * 60 * 60);

    info!(model_name, interval_hours, "Starting training schedule");

    loop {
        let outcome = (|| async { train::run(registry, model_name).await })
            .retry(
                &ConstantBuilder::default()
                    .with_delay(RETRY_DELAY)
                    .with_max_times(1),
            )
            .await;

        match outcome {
            Ok(()) => info!("Scheduled training run succeeded"),
            Err(error) => error!("Scheduled training run failed after retry: {error:#}"),
        }

        let next_run = Utc::now() + chrono::Duration::from_std(interval)?;
        info!(next_run = %next_run, "Sleeping until next scheduled run");

        tokio::time::sleep(interval).await;
    }
}
