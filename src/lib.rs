//! Library exports for the desktop app, the training CLI, benchmarks and tests.
/// Per-crop summaries of reference data.
pub mod analysis;
/// Application directory helpers.
pub mod app_dirs;
/// Persisted user settings.
pub mod config;
/// Crop label display helpers.
pub mod crops;
/// Soil table loading and preprocessing.
pub mod dataset;
/// Shared egui UI modules.
pub mod egui_app;
/// Atomic file replacement.
pub mod fs_atomic;
/// Tracing subscriber setup.
pub mod logging;
/// Classifiers, training and model artifacts.
pub mod ml;
/// Single-row crop prediction.
pub mod predict;
/// End-to-end retraining pipeline.
pub mod training;
