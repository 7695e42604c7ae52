//! Gradient boosting training loop.
//!
//! Exact greedy tree construction on second-order statistics of the
//! logistic loss. Given fixed data and hyperparameters the procedure is
//! fully deterministic: repeated runs produce identical forests.

use anyhow::Result;
use tracing::debug;

use crate::dataset::ChurnDataset;
use crate::forest::{logit, sigmoid, Forest, Tree, TreeNode};

/// Hyperparameters for the boosted-tree learner.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GbdtConfig {
    /// Objective name, recorded with the training parameters.
    pub objective: &'static str,
    /// Number of boosting rounds (trees).
    pub num_rounds: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Shrinkage applied to each tree's leaf weights.
    pub learning_rate: f32,
    /// L2 regularization on leaf weights.
    pub lambda: f32,
    /// Minimum gain required to keep a split.
    pub gamma: f32,
    /// Minimum hessian sum per child.
    pub min_child_weight: f32,
    /// Initial prediction before any tree is applied.
    pub base_score: f32,
}

impl Default for GbdtConfig {
    fn default() -> Self {
        Self {
            objective: "binary:logistic",
            num_rounds: 100,
            max_depth: 4,
            learning_rate: 0.3,
            lambda: 1.0,
            gamma: 0.0,
            min_child_weight: 1.0,
            base_score: 0.5,
        }
    }
}

/// The best split found for a node.
#[derive(Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    split_value: f32,
    gain: f32,
}

/// Trains a boosted forest on the dataset.
///
/// # Errors
///
/// Returns an error if the dataset is empty.
pub fn train(data: &ChurnDataset, config: &GbdtConfig) -> Result<Forest> {
    if data.is_empty() {
        anyhow::bail!("No training data provided");
    }

    let num_samples = data.len();
    let base_margin = logit(config.base_score);

    let mut margins = vec![base_margin; num_samples];
    let mut gradients = vec![0.0f32; num_samples];
    let mut hessians = vec![0.0f32; num_samples];
    let mut trees = Vec::with_capacity(config.num_rounds);

    for round in 0..config.num_rounds {
        // Second-order statistics of the logistic loss
        for i in 0..num_samples {
            let predicted = sigmoid(margins[i]);
            gradients[i] = predicted - data.labels[i];
            hessians[i] = predicted * (1.0 - predicted);
        }

        let tree = build_tree(data, &gradients, &hessians, config);

        for i in 0..num_samples {
            margins[i] += config.learning_rate * tree.predict(&data.features[i]);
        }

        trees.push(tree);

        if (round + 1) % 10 == 0 {
            debug!(
                round = round + 1,
                total = config.num_rounds,
                "Completed boosting round"
            );
        }
    }

    Ok(Forest {
        trees,
        learning_rate: config.learning_rate,
        base_score: config.base_score,
    })
}

/// Builds one regression tree against the current gradients.
fn build_tree(
    data: &ChurnDataset,
    gradients: &[f32],
    hessians: &[f32],
    config: &GbdtConfig,
) -> Tree {
    let mut tree = Tree::default();
    let all_samples: Vec<usize> = (0..data.len()).collect();

    grow_node(&mut tree.nodes, data, gradients, hessians, all_samples, 0, config);

    tree
}

/// Recursively grows a node, returning its index in the arena.
fn grow_node(
    nodes: &mut Vec<TreeNode>,
    data: &ChurnDataset,
    gradients: &[f32],
    hessians: &[f32],
    samples: Vec<usize>,
    depth: usize,
    config: &GbdtConfig,
) -> usize {
    let sum_gradient: f32 = samples.iter().map(|&i| gradients[i]).sum();
    let sum_hessian: f32 = samples.iter().map(|&i| hessians[i]).sum();

    // Provisional leaf; replaced with a split node if one is found
    let node_idx = nodes.len();
    nodes.push(TreeNode::leaf(-sum_gradient / (sum_hessian + config.lambda)));

    if depth >= config.max_depth {
        return node_idx;
    }

    let Some(split) = find_best_split(
        data,
        gradients,
        hessians,
        &samples,
        sum_gradient,
        sum_hessian,
        config,
    ) else {
        return node_idx;
    };

    let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
        .into_iter()
        .partition(|&i| data.features[i][split.feature_idx] < split.split_value);

    let left_child = grow_node(nodes, data, gradients, hessians, left_samples, depth + 1, config);
    let right_child = grow_node(nodes, data, gradients, hessians, right_samples, depth + 1, config);

    nodes[node_idx] = TreeNode {
        feature_idx: split.feature_idx,
        split_value: split.split_value,
        left_child,
        right_child,
        weight: 0.0,
        is_leaf: false,
    };

    node_idx
}

/// Scans every feature for the highest-gain split of the node's samples.
///
/// Returns `None` when no split improves the regularized objective by more
/// than `gamma` or when every candidate violates `min_child_weight`.
fn find_best_split(
    data: &ChurnDataset,
    gradients: &[f32],
    hessians: &[f32],
    samples: &[usize],
    sum_gradient: f32,
    sum_hessian: f32,
    config: &GbdtConfig,
) -> Option<SplitCandidate> {
    let parent_score = sum_gradient * sum_gradient / (sum_hessian + config.lambda);
    let mut best: Option<SplitCandidate> = None;

    for feature_idx in 0..crate::record::FEATURE_COUNT {
        let mut order = samples.to_vec();
        order.sort_by(|&a, &b| {
            data.features[a][feature_idx].total_cmp(&data.features[b][feature_idx])
        });

        let mut left_gradient = 0.0f32;
        let mut left_hessian = 0.0f32;

        for pair in order.windows(2) {
            left_gradient += gradients[pair[0]];
            left_hessian += hessians[pair[0]];

            let low = data.features[pair[0]][feature_idx];
            let high = data.features[pair[1]][feature_idx];

            // No boundary between equal feature values
            if low >= high {
                continue;
            }

            let right_gradient = sum_gradient - left_gradient;
            let right_hessian = sum_hessian - left_hessian;

            if left_hessian < config.min_child_weight || right_hessian < config.min_child_weight {
                continue;
            }

            let gain = 0.5
                * (left_gradient * left_gradient / (left_hessian + config.lambda)
                    + right_gradient * right_gradient / (right_hessian + config.lambda)
                    - parent_score);

            if gain <= config.gamma {
                continue;
            }

            if best.map_or(true, |candidate| gain > candidate.gain) {
                best = Some(SplitCandidate {
                    feature_idx,
                    split_value: (low + high) * 0.5,
                    gain,
                });
            }
        }
    }

    best
}
