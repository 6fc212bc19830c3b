//! Persisted classifier artifact.
//!
//! The artifact is a JSON document tagged with `kind`. Saving overwrites the
//! target path unconditionally; loading validates structure before use.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::centroid::{NearestCentroidModel, train_nearest_centroid};
use super::gbdt::{GbdtModel, TrainOptions, train_gbdt};
use super::{Classifier, FitError, TrainDataset};
use crate::fs_atomic::write_atomic;

/// Classifier family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    GradientBoosting,
    NearestCentroid,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::GradientBoosting, ModelKind::NearestCentroid];

    /// Stable identifier used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::GradientBoosting => "gradient_boosting",
            ModelKind::NearestCentroid => "nearest_centroid",
        }
    }

    /// Human-readable name for the UI.
    pub fn label(self) -> &'static str {
        match self {
            ModelKind::GradientBoosting => "Gradient-boosted trees",
            ModelKind::NearestCentroid => "Nearest centroid",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("Unknown model kind: {value}"))
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read model {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write model {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid model JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize model: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Invalid model {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// A fitted classifier as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    GradientBoosting(GbdtModel),
    NearestCentroid(NearestCentroidModel),
}

impl ModelArtifact {
    /// Fit a model of the requested kind.
    pub fn fit(
        kind: ModelKind,
        dataset: &TrainDataset,
        options: &TrainOptions,
    ) -> Result<Self, FitError> {
        match kind {
            ModelKind::GradientBoosting => train_gbdt(dataset, options).map(Self::GradientBoosting),
            ModelKind::NearestCentroid => {
                train_nearest_centroid(dataset).map(Self::NearestCentroid)
            }
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ModelArtifact::GradientBoosting(model) => model as &dyn Classifier,
            ModelArtifact::NearestCentroid(model) => model as &dyn Classifier,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::GradientBoosting(model) => model.validate(),
            ModelArtifact::NearestCentroid(model) => model.validate(),
        }
    }

    /// Serialize to `path`, creating parent directories and replacing any previous model.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let bytes = serde_json::to_vec_pretty(self).map_err(ArtifactError::Serialize)?;
        write_atomic(path, &bytes).map_err(|source| ArtifactError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved {} model to {}", self.kind(), path.display());
        Ok(())
    }

    /// Read and validate a model from `path`.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.is_file() {
            return Err(ArtifactError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        artifact
            .validate()
            .map_err(|reason| ArtifactError::Invalid {
                path: path.to_path_buf(),
                reason,
            })?;
        tracing::info!(
            "Loaded {} model with {} classes from {}",
            artifact.kind(),
            artifact.classes().len(),
            path.display()
        );
        Ok(artifact)
    }
}

impl Classifier for ModelArtifact {
    fn kind(&self) -> ModelKind {
        self.inner().kind()
    }

    fn classes(&self) -> &[String] {
        self.inner().classes()
    }

    fn feature_len(&self) -> usize {
        self.inner().feature_len()
    }

    fn predict_class_index(&self, features: &[f32]) -> usize {
        self.inner().predict_class_index(features)
    }

    fn predict_proba(&self, features: &[f32]) -> Option<Vec<f32>> {
        self.inner().predict_proba(features)
    }
}

/// Load the persisted model at `path`.
pub fn load_model(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    ModelArtifact::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dataset() -> TrainDataset {
        TrainDataset {
            feature_names: vec!["a".into()],
            classes: vec!["low".into(), "high".into()],
            x: vec![vec![0.0], vec![1.0], vec![9.0], vec![10.0]],
            y: vec![0, 0, 1, 1],
        }
    }

    fn small_options() -> TrainOptions {
        TrainOptions {
            rounds: 5,
            ..TrainOptions::default()
        }
    }

    #[test]
    fn save_then_load_preserves_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("model.json");
        for kind in ModelKind::ALL {
            let artifact = ModelArtifact::fit(kind, &dataset(), &small_options()).unwrap();
            artifact.save(&path).unwrap();
            let loaded = load_model(&path).unwrap();
            assert_eq!(loaded, artifact);
            assert_eq!(loaded.kind(), kind);
        }
    }

    #[test]
    fn json_is_tagged_with_kind() {
        let artifact =
            ModelArtifact::fit(ModelKind::NearestCentroid, &dataset(), &small_options()).unwrap();
        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(value["kind"], "nearest_centroid");
        assert_eq!(value["classes"][1], "high");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_model(&dir.path().join("absent.json")),
            Err(ArtifactError::NotFound { .. })
        ));
    }

    #[test]
    fn corrupt_and_invalid_files_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(load_model(&path), Err(ArtifactError::Parse { .. })));

        let artifact =
            ModelArtifact::fit(ModelKind::GradientBoosting, &dataset(), &small_options()).unwrap();
        let mut value = serde_json::to_value(&artifact).unwrap();
        value["init_raw"] = serde_json::json!([0.0]);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        assert!(matches!(load_model(&path), Err(ArtifactError::Invalid { .. })));
    }

    #[test]
    fn kind_parses_from_identifier() {
        assert_eq!(
            "nearest_centroid".parse::<ModelKind>(),
            Ok(ModelKind::NearestCentroid)
        );
        assert!("forest".parse::<ModelKind>().is_err());
        assert_eq!(ModelKind::default(), ModelKind::GradientBoosting);
    }
}
