//! Shared configuration for the churn prediction platform.

mod config;

pub use config::{get_store_path, Config, CONFIG, MODEL_STORE};
