//! End-to-end retraining: preprocess, split, fit, evaluate, persist.

use std::fmt;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use thiserror::Error;

use crate::config::TrainingSettings;
use crate::dataset::{self, DatasetError};
use crate::ml::gbdt::TrainOptions;
use crate::ml::metrics::{self, ConfusionMatrix, PerClassStats};
use crate::ml::{ArtifactError, FitError, ModelArtifact, ModelKind};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStage {
    Preprocessing,
    Splitting,
    Fitting,
    Evaluating,
    Saving,
    Done,
}

impl TrainingStage {
    pub const COUNT: usize = 5;

    /// Stages finished once this stage has started.
    pub fn completed(self) -> usize {
        match self {
            TrainingStage::Preprocessing => 0,
            TrainingStage::Splitting => 1,
            TrainingStage::Fitting => 2,
            TrainingStage::Evaluating => 3,
            TrainingStage::Saving => 4,
            TrainingStage::Done => 5,
        }
    }

    pub fn fraction(self) -> f32 {
        self.completed() as f32 / Self::COUNT as f32
    }
}

impl fmt::Display for TrainingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TrainingStage::Preprocessing => "Preprocessing data…",
            TrainingStage::Splitting => "Splitting train/test rows…",
            TrainingStage::Fitting => "Fitting model…",
            TrainingStage::Evaluating => "Evaluating holdout…",
            TrainingStage::Saving => "Saving model…",
            TrainingStage::Done => "Training complete",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    pub kind: ModelKind,
    pub gbdt: TrainOptions,
    /// Holdout fraction; `0.0` fits on every row and skips evaluation.
    pub test_fraction: f32,
    /// Seed for the holdout shuffle.
    pub seed: u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self::from_settings(ModelKind::default(), &TrainingSettings::default())
    }
}

impl TrainingOptions {
    pub fn from_settings(kind: ModelKind, settings: &TrainingSettings) -> Self {
        Self {
            kind,
            gbdt: settings.gbdt_options(),
            test_fraction: settings.test_fraction,
            seed: settings.seed,
        }
    }
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub kind: ModelKind,
    /// Rows that survived preprocessing.
    pub samples: usize,
    pub dropped_rows: usize,
    pub classes: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Holdout accuracy; `None` when no rows were withheld.
    pub accuracy: Option<f32>,
    pub per_class: Vec<PerClassStats>,
    pub confusion: Option<ConfusionMatrix>,
    pub model_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("Model fit failed: {0}")]
    Fit(#[from] FitError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Train on `table` and persist the fitted model to `model_path`.
///
/// `progress` is called when each stage begins and once more with
/// [`TrainingStage::Done`].
pub fn run_training_pipeline(
    table: &DataFrame,
    options: &TrainingOptions,
    model_path: &Path,
    mut progress: impl FnMut(TrainingStage),
) -> Result<(ModelArtifact, TrainingReport), TrainingError> {
    progress(TrainingStage::Preprocessing);
    let soil = dataset::preprocess(table)?;
    if soil.dropped_rows > 0 {
        tracing::warn!("Dropped {} incomplete rows before training", soil.dropped_rows);
    }
    let data = soil.to_train_dataset();
    data.validate()?;

    progress(TrainingStage::Splitting);
    let (train, test) = dataset::train_test_split(&data, options.test_fraction, options.seed);
    tracing::info!(
        "Training {} on {} rows ({} held out, {} classes)",
        options.kind,
        train.len(),
        test.len(),
        data.classes.len()
    );

    progress(TrainingStage::Fitting);
    let model = ModelArtifact::fit(options.kind, &train, &options.gbdt)?;

    progress(TrainingStage::Evaluating);
    let evaluation = (!test.is_empty()).then(|| metrics::evaluate(&model, &test));
    if let Some(evaluation) = &evaluation {
        tracing::info!("Holdout accuracy: {:.4}", evaluation.accuracy);
    }

    progress(TrainingStage::Saving);
    model.save(model_path)?;

    progress(TrainingStage::Done);
    let (accuracy, per_class, confusion) = match evaluation {
        Some(eval) => (Some(eval.accuracy), eval.per_class, Some(eval.confusion)),
        None => (None, Vec::new(), None),
    };
    let report = TrainingReport {
        kind: options.kind,
        samples: soil.len(),
        dropped_rows: soil.dropped_rows,
        classes: data.classes.clone(),
        train_rows: train.len(),
        test_rows: test.len(),
        accuracy,
        per_class,
        confusion,
        model_path: model_path.to_path_buf(),
    };
    Ok((model, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::Classifier;
    use tempfile::tempdir;

    fn table() -> DataFrame {
        let mut csv = String::from("N,P,K,ph,crop\n");
        for i in 0..10 {
            let jitter = i as f32 * 0.5;
            csv.push_str(&format!("{},{},{},{:.2},rice\n", 80.0 + jitter, 45.0, 40.0, 6.4));
            csv.push_str(&format!("{},{},{},{:.2},chickpea\n", 40.0 + jitter, 68.0, 80.0, 7.3));
        }
        csv.push_str(",50,50,6.0,rice\n");
        dataset::parse_table(csv.as_bytes()).unwrap()
    }

    fn fast_options(kind: ModelKind) -> TrainingOptions {
        TrainingOptions {
            kind,
            gbdt: TrainOptions {
                rounds: 15,
                ..TrainOptions::default()
            },
            ..TrainingOptions::default()
        }
    }

    #[test]
    fn pipeline_reports_every_stage_and_saves() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("model.json");
        let mut stages = Vec::new();
        let (model, report) = run_training_pipeline(
            &table(),
            &fast_options(ModelKind::GradientBoosting),
            &path,
            |stage| stages.push(stage),
        )
        .unwrap();

        assert_eq!(
            stages,
            vec![
                TrainingStage::Preprocessing,
                TrainingStage::Splitting,
                TrainingStage::Fitting,
                TrainingStage::Evaluating,
                TrainingStage::Saving,
                TrainingStage::Done,
            ]
        );
        assert!(path.is_file());
        assert_eq!(report.samples, 20);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.classes, vec!["chickpea", "rice"]);
        assert_eq!(report.train_rows + report.test_rows, 20);
        assert_eq!(report.test_rows, 4);
        assert_eq!(report.accuracy, Some(1.0));
        assert_eq!(report.per_class.len(), 2);
        assert_eq!(model.classes(), report.classes.as_slice());
    }

    #[test]
    fn zero_test_fraction_skips_evaluation() {
        let dir = tempdir().unwrap();
        let mut options = fast_options(ModelKind::NearestCentroid);
        options.test_fraction = 0.0;
        let (_, report) =
            run_training_pipeline(&table(), &options, &dir.path().join("m.json"), |_| {})
                .unwrap();
        assert_eq!(report.test_rows, 0);
        assert_eq!(report.accuracy, None);
        assert!(report.confusion.is_none());
    }

    #[test]
    fn missing_columns_fail_before_fitting() {
        let dir = tempdir().unwrap();
        let table = dataset::parse_table(b"N,P,crop\n1,2,rice\n").unwrap();
        let path = dir.path().join("m.json");
        let mut stages = Vec::new();
        let err = run_training_pipeline(&table, &TrainingOptions::default(), &path, |stage| {
            stages.push(stage)
        })
        .unwrap_err();
        assert!(matches!(
            err,
            TrainingError::Dataset(DatasetError::MissingColumns { .. })
        ));
        assert_eq!(stages, vec![TrainingStage::Preprocessing]);
        assert!(!path.exists());
    }

    #[test]
    fn single_class_is_a_fit_error() {
        let dir = tempdir().unwrap();
        let table = dataset::parse_table(b"N,P,K,ph,crop\n1,2,3,6,rice\n2,3,4,6,rice\n").unwrap();
        let err = run_training_pipeline(
            &table,
            &TrainingOptions::default(),
            &dir.path().join("m.json"),
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, TrainingError::Fit(FitError::TooFewClasses { found: 1 })));
    }

    #[test]
    fn out_of_range_cells_do_not_poison_saved_centroids() {
        let dir = tempdir().unwrap();
        let table = dataset::parse_table(
            b"N,P,K,ph,crop\n1e39,1,1,6,rice\n2,2,2,6,rice\n80,40,40,6.5,maize\n82,41,39,6.4,maize\n",
        )
        .unwrap();
        let mut options = fast_options(ModelKind::NearestCentroid);
        options.test_fraction = 0.0;
        let path = dir.path().join("m.json");
        let (_, report) = run_training_pipeline(&table, &options, &path, |_| {}).unwrap();
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.samples, 3);

        let reloaded = crate::ml::load_model(&path).unwrap();
        assert_eq!(reloaded.kind(), ModelKind::NearestCentroid);
    }

    #[test]
    fn stage_fractions_increase() {
        assert_eq!(TrainingStage::Preprocessing.fraction(), 0.0);
        assert_eq!(TrainingStage::Done.fraction(), 1.0);
        assert!(TrainingStage::Fitting.fraction() < TrainingStage::Saving.fraction());
    }
}
