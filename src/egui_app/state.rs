//! Shared state types for the egui UI.

use std::path::PathBuf;

use crate::analysis::CropSummary;
use crate::dataset::TablePreview;
use crate::ml::ModelKind;
use crate::predict::{Prediction, SoilReading};
use crate::training::{TrainingReport, TrainingStage};

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub page: Page,
    pub status: StatusBarState,
    pub home: HomeState,
    pub analyze: AnalyzeState,
    pub train: TrainState,
}

/// Sidebar destinations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    Analyze,
    Train,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Analyze, Page::Train];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "🏠 Home",
            Page::Analyze => "📊 Analyze",
            Page::Train => "🛠 Re-Train",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusTone {
    #[default]
    Idle,
    Info,
    Busy,
    Success,
    Error,
}

impl StatusTone {
    pub fn label(self) -> &'static str {
        match self {
            StatusTone::Idle => "Idle",
            StatusTone::Info => "Info",
            StatusTone::Busy => "Working",
            StatusTone::Success => "Done",
            StatusTone::Error => "Error",
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self {
            text: "Ready".into(),
            tone: StatusTone::Idle,
        }
    }
}

/// Recommendation form and its last outcome.
#[derive(Clone, Debug, Default)]
pub struct HomeState {
    pub reading: SoilReading,
    pub result: Option<Prediction>,
    pub error: Option<String>,
    /// Set when no usable model could be loaded.
    pub model_error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AnalyzeState {
    pub dataset_path: Option<PathBuf>,
    pub crops: Vec<String>,
    pub selected: Option<String>,
    pub summary: Option<CropSummary>,
    pub error: Option<String>,
}

/// Re-Train page: chosen file, its preview, and the running or finished job.
#[derive(Clone, Debug, Default)]
pub struct TrainState {
    pub data_path: Option<PathBuf>,
    pub preview: Option<TablePreview>,
    pub kind: ModelKind,
    pub progress: Option<TrainingProgress>,
    pub report: Option<TrainingReport>,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingProgress {
    pub stage: TrainingStage,
    pub fraction: f32,
}

impl TrainingProgress {
    pub fn at(stage: TrainingStage) -> Self {
        Self {
            stage,
            fraction: stage.fraction(),
        }
    }
}
