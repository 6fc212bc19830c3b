use std::path::Path;

use super::jobs::{JobMessage, TrainingJob};
use super::*;
use crate::dataset;
use crate::ml::ModelKind;
use crate::training::{TrainingOptions, TrainingStage};

/// Rows shown in the Re-Train preview grid.
pub(crate) const PREVIEW_ROWS: usize = 5;

impl CropController {
    /// Open a file dialog and stage the chosen CSV for training.
    pub fn pick_training_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        else {
            return;
        };
        self.set_training_file(&path);
    }

    /// Load `path` and show its preview; the table is kept for the next training run.
    pub fn set_training_file(&mut self, path: &Path) {
        self.training_table = None;
        self.ui.train.data_path = Some(path.to_path_buf());
        self.ui.train.preview = None;
        self.ui.train.report = None;
        self.ui.train.error = None;
        let staged = dataset::load_table(path).and_then(|table| {
            dataset::preview(&table, PREVIEW_ROWS).map(|preview| (table, preview))
        });
        match staged {
            Ok((table, preview)) => {
                tracing::info!("Data preview displayed.");
                self.ui.train.preview = Some(preview);
                self.training_table = Some(table);
                self.set_status(format!("Loaded {}", path.display()), StatusTone::Info);
            }
            Err(err) => {
                tracing::error!("Error processing file: {err}");
                self.ui.train.error = Some(
                    "An error occurred while processing the file. Please check the format and try again."
                        .into(),
                );
                self.set_status("Could not read the training file", StatusTone::Error);
            }
        }
    }

    pub fn set_training_kind(&mut self, kind: ModelKind) {
        if self.ui.train.kind == kind {
            return;
        }
        self.ui.train.kind = kind;
        self.settings.model.kind = kind;
        self.persist_settings();
    }

    pub fn training_in_progress(&self) -> bool {
        self.jobs.training_in_progress()
    }

    /// Start a background fit on the staged table.
    pub fn start_training(&mut self) {
        if self.jobs.training_in_progress() {
            self.set_status("Model training already running", StatusTone::Info);
            return;
        }
        let Some(table) = self.training_table.clone() else {
            self.set_status("Choose a CSV file to train on first", StatusTone::Info);
            return;
        };
        let model_path = match self.model_path() {
            Ok(path) => path,
            Err(err) => {
                tracing::error!("Error during training: {err}");
                self.training_failed();
                return;
            }
        };
        tracing::info!("Training started.");
        let options = TrainingOptions::from_settings(self.ui.train.kind, &self.settings.training);
        self.ui.train.report = None;
        self.ui.train.error = None;
        self.ui.train.progress = Some(TrainingProgress::at(TrainingStage::Preprocessing));
        self.set_status("Training model…", StatusTone::Busy);
        self.jobs.begin_training(TrainingJob {
            table,
            options,
            model_path,
        });
    }

    pub(super) fn handle_job_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::Progress(stage) => {
                self.ui.train.progress = Some(TrainingProgress::at(stage));
                self.set_status(stage.to_string(), StatusTone::Busy);
            }
            JobMessage::Finished(result) => {
                self.jobs.clear_training();
                match result {
                    Ok(report) => {
                        tracing::info!("Model training completed successfully.");
                        self.ui.train.progress = Some(TrainingProgress::at(TrainingStage::Done));
                        self.ui.train.report = Some(report);
                        self.ui.home.result = None;
                        self.reload_model();
                        if self.model.is_some() {
                            self.set_status("Model trained successfully!", StatusTone::Success);
                        }
                    }
                    Err(_) => self.training_failed(),
                }
            }
        }
    }

    fn training_failed(&mut self) {
        self.ui.train.progress = None;
        self.ui.train.error =
            Some("Something went wrong during model training. Please try again.".into());
        self.set_status("Model training failed", StatusTone::Error);
    }
}
