//! Classifiers for soil feature vectors: fitting, evaluation, and persistence.

pub mod artifact;
pub mod centroid;
pub mod gbdt;
pub mod metrics;

mod classifier;
mod train_data;

pub use artifact::{ArtifactError, ModelArtifact, ModelKind, load_model};
pub use classifier::Classifier;
pub use train_data::{FitError, TrainDataset};
