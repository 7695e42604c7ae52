//! Serializable gradient-boosted forest and inference.

use serde::{Deserialize, Serialize};

use crate::record::FEATURE_COUNT;

/// A single node in a decision tree, stored in a flat arena.
///
/// Rows with `features[feature_idx] < split_value` descend left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub feature_idx: usize,
    pub split_value: f32,
    pub left_child: usize,
    pub right_child: usize,
    pub weight: f32,
    pub is_leaf: bool,
}

impl TreeNode {
    /// Creates a leaf node carrying the given weight.
    #[must_use]
    pub const fn leaf(weight: f32) -> Self {
        Self {
            feature_idx: 0,
            split_value: 0.0,
            left_child: 0,
            right_child: 0,
            weight,
            is_leaf: true,
        }
    }
}

/// One regression tree of the boosted ensemble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Returns the leaf weight reached by the given feature vector.
    #[must_use]
    pub fn predict(&self, features: &[f32; FEATURE_COUNT]) -> f32 {
        let mut idx = 0;

        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };

            if node.is_leaf {
                return node.weight;
            }

            idx = if features[node.feature_idx] < node.split_value {
                node.left_child
            } else {
                node.right_child
            };
        }
    }
}

/// A trained gradient-boosted forest for binary classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    pub trees: Vec<Tree>,
    pub learning_rate: f32,
    pub base_score: f32,
}

impl Forest {
    /// Raw additive margin (log-odds) before the sigmoid.
    #[must_use]
    pub fn margin(&self, features: &[f32; FEATURE_COUNT]) -> f32 {
        let tree_sum: f32 = self.trees.iter().map(|tree| tree.predict(features)).sum();

        logit(self.base_score) + self.learning_rate * tree_sum
    }

    /// Predicts the churn probability for one encoded row.
    #[must_use]
    pub fn predict_proba(&self, features: &[f32; FEATURE_COUNT]) -> f32 {
        sigmoid(self.margin(features))
    }
}

/// Logistic function.
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Inverse of the logistic function.
pub(crate) fn logit(p: f32) -> f32 {
    (p / (1.0 - p)).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A depth-1 tree splitting on tenure at 10.0.
    fn stump() -> Tree {
        Tree {
            nodes: vec![
                TreeNode {
                    feature_idx: 0,
                    split_value: 10.0,
                    left_child: 1,
                    right_child: 2,
                    weight: 0.0,
                    is_leaf: false,
                },
                TreeNode::leaf(-1.0),
                TreeNode::leaf(1.0),
            ],
        }
    }

    #[test]
    fn test_tree_routing() {
        let tree = stump();

        let mut low = [0.0; FEATURE_COUNT];
        low[0] = 5.0;
        let mut high = [0.0; FEATURE_COUNT];
        high[0] = 20.0;

        assert!((tree.predict(&low) + 1.0).abs() < f32::EPSILON);
        assert!((tree.predict(&high) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_tree_predicts_zero() {
        let tree = Tree::default();
        assert!((tree.predict(&[0.0; FEATURE_COUNT])).abs() < f32::EPSILON);
    }

    #[test]
    fn test_forest_probability() {
        let forest = Forest {
            trees: vec![stump()],
            learning_rate: 1.0,
            base_score: 0.5,
        };

        let mut low = [0.0; FEATURE_COUNT];
        low[0] = 5.0;
        let mut high = [0.0; FEATURE_COUNT];
        high[0] = 20.0;

        // base margin is 0, so probabilities are sigmoid(-1) and sigmoid(1)
        assert!((forest.predict_proba(&low) - sigmoid(-1.0)).abs() < 1e-6);
        assert!((forest.predict_proba(&high) - sigmoid(1.0)).abs() < 1e-6);
        assert!(forest.predict_proba(&low) < 0.5);
        assert!(forest.predict_proba(&high) > 0.5);
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!((sigmoid(0.0) - 0.5).abs() < f32::EPSILON);
        assert!(sigmoid(30.0) > 0.999);
        assert!(sigmoid(-30.0) < 0.001);
        assert!((logit(0.5)).abs() < f32::EPSILON);
    }
}
