//! Binary classification metrics on a held-out split.

use serde::{Deserialize, Serialize};

/// Decision threshold shared by evaluation and serving.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Standard classification metrics at the decision threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Computes accuracy, precision, recall and F1 for thresholded probabilities.
///
/// Degenerate denominators (no positive predictions, no positive labels,
/// empty input) score 0 for the affected metric.
#[must_use]
pub fn evaluate(probabilities: &[f32], labels: &[f32]) -> EvalMetrics {
    debug_assert_eq!(probabilities.len(), labels.len());

    let mut true_positives = 0u64;
    let mut false_positives = 0u64;
    let mut true_negatives = 0u64;
    let mut false_negatives = 0u64;

    for (probability, label) in probabilities.iter().zip(labels) {
        let predicted = *probability >= DECISION_THRESHOLD;
        let actual = *label >= 0.5;

        match (predicted, actual) {
            (true, true) => true_positives += 1,
            (true, false) => false_positives += 1,
            (false, false) => true_negatives += 1,
            (false, true) => false_negatives += 1,
        }
    }

    let total = true_positives + false_positives + true_negatives + false_negatives;

    let accuracy = ratio(true_positives + true_negatives, total);
    let precision = ratio(true_positives, true_positives + false_positives);
    let recall = ratio(true_positives, true_positives + false_negatives);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    EvalMetrics {
        accuracy,
        precision,
        recall,
        f1,
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
