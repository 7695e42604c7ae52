use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use anyhow::Context;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;

/// Returns the base path for the model store.
#[must_use]
pub fn get_store_path() -> PathBuf {
    dotenvy::dotenv().ok();

    std::env::var("MODEL_STORE_PATH").map_or_else(|_| PathBuf::from("model_store"), PathBuf::from)
}

/// Global model store instance, lazily initialized.
pub static MODEL_STORE: LazyLock<Arc<dyn ObjectStore>> = LazyLock::new(|| {
    let store_path = get_store_path();

    std::fs::create_dir_all(&store_path).expect("Failed to create model store directory");

    Arc::new(LocalFileSystem::new_with_prefix(&store_path).expect("Failed to create model store"))
});

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::from_env().expect("Failed to create config"));

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Name the trained model is registered and served under
    pub model_name: String,

    /// Address the prediction API binds to
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `MODEL_NAME`: registered model name (default: `customer_churn`)
    /// - `BIND_ADDR`: serving address (default: `0.0.0.0:8000`)
    /// - `MODEL_STORE_PATH`: base directory for the model store (default: `model_store`)
    ///
    /// # Errors
    ///
    /// Returns an error if `BIND_ADDR` is not a valid socket address.
    fn from_env() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        let model_name =
            std::env::var("MODEL_NAME").unwrap_or_else(|_| "customer_churn".to_string());

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        Ok(Self {
            model_name,
            bind_addr,
        })
    }
}
