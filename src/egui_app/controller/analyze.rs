use std::path::Path;

use super::*;
use crate::analysis;
use crate::dataset;

impl CropController {
    /// Load the configured reference dataset for the Analyze page.
    pub fn load_reference_dataset(&mut self) {
        match self.settings.analysis.resolved_dataset_path() {
            Ok(path) => self.load_reference_from(&path),
            Err(err) => self.analysis_failed(err.to_string()),
        }
    }

    /// Replace the reference dataset with the CSV at `path`.
    pub fn load_reference_from(&mut self, path: &Path) {
        self.ui.analyze = AnalyzeState {
            dataset_path: Some(path.to_path_buf()),
            ..AnalyzeState::default()
        };
        self.reference = None;
        let loaded = dataset::load_table(path).and_then(|table| dataset::preprocess(&table));
        match loaded {
            Ok(soil) => {
                tracing::info!("Dataset loaded successfully.");
                self.ui.analyze.crops = analysis::unique_crops(&soil);
                let first = self.ui.analyze.crops.first().cloned();
                self.reference = Some(soil);
                if let Some(crop) = first {
                    self.select_crop(&crop);
                }
            }
            Err(err) => self.analysis_failed(err.to_string()),
        }
    }

    /// Open a file dialog and use the chosen CSV as reference data.
    pub fn pick_reference_dataset(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        else {
            return;
        };
        self.load_reference_from(&path);
        if self.reference.is_some() {
            self.settings.analysis.dataset_path = Some(path);
            self.persist_settings();
        }
    }

    pub fn select_crop(&mut self, crop: &str) {
        let Some(soil) = self.reference.as_ref() else {
            return;
        };
        let bins = self.settings.analysis.histogram_bins;
        self.ui.analyze.summary = analysis::summarize_crop(soil, crop, bins);
        self.ui.analyze.selected = Some(crop.to_string());
    }

    fn analysis_failed(&mut self, reason: String) {
        tracing::error!("Error loading reference data: {reason}");
        self.ui.analyze.error = Some(reason);
        self.set_status("Could not load the reference dataset", StatusTone::Error);
    }

    pub(super) fn persist_settings(&mut self) {
        if let Err(err) = config::save(&self.settings) {
            tracing::warn!("Failed to save config: {err}");
            self.set_status(format!("Failed to save config: {err}"), StatusTone::Error);
        }
    }
}
