//! Churn model crate for customer churn probability prediction.
//!
//! This crate defines the customer input schema, the synthetic training
//! table, and a gradient-boosted tree learner used to train and run
//! inference for the churn classifier.

pub mod dataset;
pub mod forest;
pub mod metrics;
pub mod record;
pub mod training;

pub use dataset::{prepare_training_data, ChurnDataset, SYNTHETIC_ROWS};
pub use forest::{Forest, Tree, TreeNode};
pub use metrics::{evaluate, EvalMetrics, DECISION_THRESHOLD};
pub use record::{
    signature, CustomerRecord, FieldSpec, FieldType, ModelSignature, FEATURE_COUNT, FIELD_NAMES,
};
pub use training::{train, GbdtConfig};

/// Model kind string recorded in registry manifests.
pub const MODEL_KIND: &str = "gradient_boosted_trees";
