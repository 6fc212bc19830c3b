use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app_dirs;
use crate::ml::ModelKind;
use crate::ml::gbdt::TrainOptions;

use super::{ConfigError, DATASET_FILE_NAME, MODEL_FILE_NAME};

/// Everything stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub training: TrainingSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

impl AppSettings {
    /// Clamp values that would make training or analysis meaningless.
    pub fn normalized(mut self) -> Self {
        self.training = self.training.normalized();
        self.analysis.histogram_bins = self.analysis.histogram_bins.clamp(1, 200);
        self
    }
}

/// Where the classifier lives and which kind gets trained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Override for the persisted model path; defaults to `<app root>/models/model.json`.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Classifier family fitted by the training pipeline.
    #[serde(default)]
    pub kind: ModelKind,
}

impl ModelSettings {
    /// Resolve the fixed model path, creating the default models directory if used.
    pub fn resolved_model_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.model_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::models_dir()?.join(MODEL_FILE_NAME)),
        }
    }
}

/// Hyperparameters for in-app retraining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f32,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    /// Fraction of rows sampled per boosting round.
    #[serde(default = "default_subsample")]
    pub subsample: f32,
    /// Seed shared by the holdout split and row subsampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fraction of rows withheld for evaluation; `0.0` trains on everything.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f32,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            learning_rate: default_learning_rate(),
            max_depth: default_max_depth(),
            bins: default_bins(),
            min_samples_leaf: default_min_samples_leaf(),
            subsample: default_subsample(),
            seed: default_seed(),
            test_fraction: default_test_fraction(),
        }
    }
}

impl TrainingSettings {
    fn normalized(mut self) -> Self {
        self.rounds = self.rounds.max(1);
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            self.learning_rate = default_learning_rate();
        }
        self.max_depth = self.max_depth.clamp(1, 16);
        self.bins = self.bins.clamp(2, 256);
        self.min_samples_leaf = self.min_samples_leaf.max(1);
        self.subsample = sanitize_fraction(self.subsample, default_subsample()).max(0.05);
        self.test_fraction = sanitize_fraction(self.test_fraction, default_test_fraction()).min(0.9);
        self
    }

    /// Boosting options derived from these settings.
    pub fn gbdt_options(&self) -> TrainOptions {
        TrainOptions {
            rounds: self.rounds,
            learning_rate: self.learning_rate,
            max_depth: self.max_depth,
            bins: self.bins,
            min_samples_leaf: self.min_samples_leaf,
            subsample: self.subsample,
            seed: self.seed,
        }
    }
}

/// Reference dataset used by the Analyze page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Override for the dataset path; defaults to `<app root>/data/soil_measures.csv`.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            dataset_path: None,
            histogram_bins: default_histogram_bins(),
        }
    }
}

impl AnalysisSettings {
    pub fn resolved_dataset_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.dataset_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::data_dir()?.join(DATASET_FILE_NAME)),
        }
    }
}

fn sanitize_fraction(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

fn default_rounds() -> usize {
    100
}

fn default_learning_rate() -> f32 {
    0.1
}

fn default_max_depth() -> usize {
    3
}

fn default_bins() -> usize {
    64
}

fn default_min_samples_leaf() -> usize {
    1
}

fn default_subsample() -> f32 {
    1.0
}

fn default_seed() -> u64 {
    42
}

fn default_test_fraction() -> f32 {
    0.2
}

fn default_histogram_bins() -> usize {
    20
}
