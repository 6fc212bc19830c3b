//! Deterministic gradient-boosted regression trees for multi-class classification.
//!
//! - Softmax boosting with one depth-limited tree per class per round.
//! - Histogram split search over binned features.
//! - Reproducible JSON export through [`crate::ml::ModelArtifact`].

mod model;
mod train;

pub use model::{GbdtModel, RegressionTree, TreeNode, argmax, softmax};
pub use train::{TrainOptions, train_gbdt};
