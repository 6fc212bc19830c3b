use serde::{Deserialize, Serialize};

use crate::ml::{Classifier, ModelKind};

/// Node of a regression tree stored in a flat vector.
///
/// Children always sit at larger indices than their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        /// Feature index used for the split.
        feature_index: u16,
        /// Rows with `feature < threshold` go left.
        threshold: f32,
        left: u32,
        right: u32,
    },
    Leaf {
        value: f32,
    },
}

/// Depth-limited regression tree used as a weak learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Root at index 0.
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Tree with a single constant leaf.
    pub fn leaf(value: f32) -> Self {
        Self {
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    /// Predict the tree value for a feature vector.
    pub fn predict(&self, features: &[f32]) -> f32 {
        let mut idx = 0usize;
        while let Some(node) = self.nodes.get(idx) {
            match *node {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features
                        .get(feature_index as usize)
                        .copied()
                        .unwrap_or(0.0);
                    let next = if value < threshold { left } else { right };
                    idx = next as usize;
                }
            }
        }
        0.0
    }

    /// Longest root-to-leaf path, counted in splits.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(TreeNode::Split { left, right, .. }) => {
                    1 + walk(nodes, *left as usize).max(walk(nodes, *right as usize))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    fn validate(&self, feature_len: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            let TreeNode::Split {
                feature_index,
                threshold,
                left,
                right,
            } = *node
            else {
                continue;
            };
            if feature_index as usize >= feature_len {
                return Err(format!(
                    "Node {idx} splits on feature {feature_index} but the model has {feature_len}"
                ));
            }
            if !threshold.is_finite() {
                return Err(format!("Node {idx} has a non-finite threshold"));
            }
            for child in [left as usize, right as usize] {
                if child <= idx || child >= self.nodes.len() {
                    return Err(format!("Node {idx} points at invalid child {child}"));
                }
            }
        }
        Ok(())
    }
}

/// Gradient-boosted tree model for multi-class classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtModel {
    /// Model format version.
    pub model_version: i64,
    /// Feature names in input order.
    pub feature_names: Vec<String>,
    /// Ordered list of class names.
    pub classes: Vec<String>,
    /// Learning rate applied to each tree prediction.
    pub learning_rate: f32,
    /// Initial raw logits before boosting rounds.
    pub init_raw: Vec<f32>,
    /// Shape: `[n_rounds][n_classes]`.
    pub trees: Vec<Vec<RegressionTree>>,
}

impl GbdtModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if self.feature_names.is_empty() {
            return Err("Model has no features".to_string());
        }
        if self.init_raw.len() != self.classes.len() {
            return Err("init_raw length must match classes length".to_string());
        }
        for (round_idx, round) in self.trees.iter().enumerate() {
            if round.len() != self.classes.len() {
                return Err(format!(
                    "Round {round_idx} has {} trees but expected {}",
                    round.len(),
                    self.classes.len()
                ));
            }
            for tree in round {
                tree.validate(self.feature_names.len())
                    .map_err(|err| format!("Round {round_idx}: {err}"))?;
            }
        }
        Ok(())
    }

    /// Predict raw logits for a feature vector.
    pub fn predict_raw(&self, features: &[f32]) -> Vec<f32> {
        let mut raw = self.init_raw.clone();
        for round in &self.trees {
            for (class_idx, tree) in round.iter().enumerate() {
                raw[class_idx] += self.learning_rate * tree.predict(features);
            }
        }
        raw
    }
}

impl Classifier for GbdtModel {
    fn kind(&self) -> ModelKind {
        ModelKind::GradientBoosting
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn feature_len(&self) -> usize {
        self.feature_names.len()
    }

    fn predict_class_index(&self, features: &[f32]) -> usize {
        argmax(&self.predict_raw(features))
    }

    fn predict_proba(&self, features: &[f32]) -> Option<Vec<f32>> {
        Some(softmax(&self.predict_raw(features)))
    }
}

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = raw.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    exps.into_iter().map(|v| v / sum).collect()
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(feature_index: u16, threshold: f32, left: u32, right: u32) -> TreeNode {
        TreeNode::Split {
            feature_index,
            threshold,
            left,
            right,
        }
    }

    fn two_class_model() -> GbdtModel {
        GbdtModel {
            model_version: 1,
            feature_names: vec!["a".into(), "b".into()],
            classes: vec!["low".into(), "high".into()],
            learning_rate: 1.0,
            init_raw: vec![0.0, 0.0],
            trees: vec![vec![
                RegressionTree {
                    nodes: vec![
                        split(0, 0.5, 1, 2),
                        TreeNode::Leaf { value: 1.0 },
                        TreeNode::Leaf { value: -1.0 },
                    ],
                },
                RegressionTree {
                    nodes: vec![
                        split(0, 0.5, 1, 2),
                        TreeNode::Leaf { value: -1.0 },
                        TreeNode::Leaf { value: 1.0 },
                    ],
                },
            ]],
        }
    }

    #[test]
    fn tree_walks_branches() {
        let tree = RegressionTree {
            nodes: vec![
                split(0, 0.5, 1, 2),
                TreeNode::Leaf { value: -1.0 },
                split(1, 10.0, 3, 4),
                TreeNode::Leaf { value: 2.0 },
                TreeNode::Leaf { value: 3.0 },
            ],
        };
        assert_eq!(tree.predict(&[0.4, 0.0]), -1.0);
        assert_eq!(tree.predict(&[0.5, 9.0]), 2.0);
        assert_eq!(tree.predict(&[0.6, 10.0]), 3.0);
        assert_eq!(tree.depth(), 2);
        assert_eq!(RegressionTree::leaf(4.0).depth(), 0);
    }

    #[test]
    fn model_predicts_argmax_and_probabilities() {
        let model = two_class_model();
        assert_eq!(model.predict_class_index(&[0.0, 0.0]), 0);
        assert_eq!(model.predict_class_index(&[1.0, 0.0]), 1);

        let proba = model.predict_proba(&[1.0, 0.0]).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(proba[1] > 0.85);
    }

    #[test]
    fn validate_rejects_backward_children() {
        let mut model = two_class_model();
        assert!(model.validate().is_ok());
        model.trees[0][0].nodes[0] = split(0, 0.0, 0, 2);
        assert!(model.validate().is_err());

        let mut model = two_class_model();
        model.trees[0][1].nodes[0] = split(7, 0.0, 1, 2);
        assert!(model.validate().is_err());

        let mut model = two_class_model();
        model.trees[0].pop();
        assert!(model.validate().is_err());
    }

    #[test]
    fn softmax_is_stable() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!(softmax(&[]).is_empty());
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), 1);
    }
}
