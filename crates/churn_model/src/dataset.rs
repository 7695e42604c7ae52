//! Labelled training table and deterministic splitting.

use crate::record::{CustomerRecord, FEATURE_COUNT};

/// Number of rows in the synthetic training table.
pub const SYNTHETIC_ROWS: usize = 1000;

/// A labelled table of encoded customer rows.
#[derive(Debug, Clone, Default)]
pub struct ChurnDataset {
    /// Encoded feature vectors, one per row.
    pub features: Vec<[f32; FEATURE_COUNT]>,
    /// Binary churn labels (0.0 or 1.0), aligned with `features`.
    pub labels: Vec<f32>,
}

impl ChurnDataset {
    /// Creates a new empty dataset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Encodes and appends one labelled record.
    pub fn push(&mut self, record: &CustomerRecord, churned: bool) {
        self.features.push(record.encode());
        self.labels.push(if churned { 1.0 } else { 0.0 });
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Splits the table into train and test sets using a seeded shuffle.
    ///
    /// The same seed always produces the same partition. The first
    /// `test_ratio` share of the shuffled rows becomes the test set.
    #[must_use]
    pub fn split(&self, test_ratio: f64, seed: u64) -> (Self, Self) {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        shuffle_indices(&mut indices, seed);

        let test_len = (self.len() as f64 * test_ratio).round() as usize;
        let (test_indices, train_indices) = indices.split_at(test_len.min(self.len()));

        (self.subset(train_indices), self.subset(test_indices))
    }

    /// Builds a new dataset from the given row indices.
    fn subset(&self, indices: &[usize]) -> Self {
        let mut features = Vec::with_capacity(indices.len());
        let mut labels = Vec::with_capacity(indices.len());

        for &i in indices {
            features.push(self.features[i]);
            labels.push(self.labels[i]);
        }

        Self { features, labels }
    }
}

/// Shuffles indices using a simple LCG-based shuffle.
fn shuffle_indices(indices: &mut [usize], seed: u64) {
    // Simple Fisher-Yates shuffle with LCG random
    let mut rng_state = seed.wrapping_add(12345);

    for i in (1..indices.len()).rev() {
        // LCG: state = (a * state + c) mod m
        rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let j = ((rng_state >> 33) as usize) % (i + 1);
        indices.swap(i, j);
    }
}

/// Fabricates the fixed synthetic churn table.
///
/// Feature values are deterministic functions of the row index and the
/// label alternates between the classes. Stand-in for a real data source.
#[must_use]
pub fn prepare_training_data() -> ChurnDataset {
    let mut data = ChurnDataset::new();

    for i in 0..SYNTHETIC_ROWS {
        let record = CustomerRecord {
            tenure: i as i64,
            monthly_charges: (i as f64).mul_add(0.1, 50.0),
            total_charges: 500.0 + i as f64,
            contract_type: "Month-to-month".to_string(),
            payment_method: "Electronic check".to_string(),
            internet_service: "Fiber optic".to_string(),
            online_security: "No".to_string(),
            tech_support: "No".to_string(),
        };

        data.push(&record, i % 2 == 1);
    }

    data
}
