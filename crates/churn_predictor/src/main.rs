//! Customer Churn Prediction Platform
//!
//! Trains a gradient-boosted churn classifier on a schedule and serves
//! churn probabilities over HTTP from a versioned model registry.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use model_registry::ModelRegistry;
use tracing_subscriber::EnvFilter;

mod commands;

/// Customer Churn Prediction Platform
#[derive(Parser)]
#[command(name = "churn-predictor")]
#[command(about = "Training pipeline and serving API for customer churn prediction")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the training pipeline once
    Train {
        /// Name to register the trained model under (default: MODEL_NAME)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Run the training pipeline on a fixed schedule
    Schedule {
        /// Name to register the trained model under (default: MODEL_NAME)
        #[arg(short, long)]
        name: Option<String>,

        /// Hours between scheduled runs
        #[arg(long, default_value = "24")]
        interval_hours: u64,
    },

    /// Serve the prediction API
    Serve {
        /// Address to bind (default: BIND_ADDR)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Model name to serve (default: MODEL_NAME)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Mark a model version as production
    Promote {
        /// Model name (default: MODEL_NAME)
        #[arg(short, long)]
        name: Option<String>,

        /// Version to promote (latest if not specified)
        #[arg(long)]
        version: Option<u32>,
    },

    /// List registered model versions
    Models {
        /// Model name (default: MODEL_NAME)
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn resolve_name(name: Option<String>) -> String {
    name.unwrap_or_else(|| config::CONFIG.model_name.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = ModelRegistry::new(Arc::clone(&config::MODEL_STORE));

    match cli.command {
        Commands::Train { name } => {
            commands::train::run(&registry, &resolve_name(name)).await?;
        }
        Commands::Schedule {
            name,
            interval_hours,
        } => {
            commands::schedule::run(&registry, &resolve_name(name), interval_hours).await?;
        }
        Commands::Serve { bind, name } => {
            commands::serve::run(registry, &resolve_name(name), bind).await?;
        }
        Commands::Promote { name, version } => {
            commands::promote::run(&registry, &resolve_name(name), version).await?;
        }
        Commands::Models { name } => {
            commands::models::run(&registry, &resolve_name(name)).await?;
        }
    }

    Ok(())
}
