//! UI-toolkit-free application logic behind the egui pages.

mod analyze;
pub(crate) mod jobs;
mod recommend;
mod retrain;

use std::path::PathBuf;

use polars::prelude::DataFrame;

use crate::config::{self, AppSettings, ConfigError};
use crate::dataset::SoilDataset;
use crate::egui_app::state::*;
use crate::ml::{self, Classifier, ModelArtifact};

use jobs::ControllerJobs;

/// Maintains app state and bridges core logic to the egui UI.
pub struct CropController {
    pub ui: UiState,
    settings: AppSettings,
    model: Option<ModelArtifact>,
    reference: Option<SoilDataset>,
    training_table: Option<DataFrame>,
    jobs: ControllerJobs,
}

impl CropController {
    pub fn new(settings: AppSettings) -> Self {
        let mut ui = UiState::default();
        ui.train.kind = settings.model.kind;
        Self {
            ui,
            settings,
            model: None,
            reference: None,
            training_table: None,
            jobs: ControllerJobs::new(),
        }
    }

    /// Load persisted config and the current model.
    pub fn load_configuration(&mut self) -> Result<(), ConfigError> {
        let settings = config::load_or_default()?;
        self.ui.train.kind = settings.model.kind;
        self.settings = settings;
        self.reload_model();
        Ok(())
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn model(&self) -> Option<&ModelArtifact> {
        self.model.as_ref()
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status = StatusBarState {
            text: text.into(),
            tone,
        };
    }

    /// Switch pages, loading the reference dataset the first time Analyze opens.
    pub fn navigate(&mut self, page: Page) {
        self.ui.page = page;
        if page == Page::Analyze && self.reference.is_none() && self.ui.analyze.error.is_none() {
            self.load_reference_dataset();
        }
    }

    /// Reload the persisted model, replacing whatever is in memory.
    pub fn reload_model(&mut self) {
        let path = match self.model_path() {
            Ok(path) => path,
            Err(err) => {
                tracing::error!("Error loading model: {err}");
                self.model = None;
                self.ui.home.model_error = Some(err.to_string());
                return;
            }
        };
        match ml::load_model(&path) {
            Ok(model) => {
                self.set_status(
                    format!("Loaded {} model with {} crops", model.kind(), model.classes().len()),
                    StatusTone::Info,
                );
                self.model = Some(model);
                self.ui.home.model_error = None;
            }
            Err(err) => {
                tracing::error!("Error loading model: {err}");
                self.model = None;
                self.ui.home.model_error = Some(err.to_string());
                self.set_status(
                    "Failed to load the model. Please try again later.",
                    StatusTone::Error,
                );
            }
        }
    }

    fn model_path(&self) -> Result<PathBuf, ConfigError> {
        self.settings.model.resolved_model_path()
    }

    /// Drain worker messages; call once per frame.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(_) => break,
            };
            self.handle_job_message(message);
        }
    }
}
