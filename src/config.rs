//! Persisted application settings (`config.toml` in the app root).

mod io;
mod settings;


use std::path::PathBuf;

use thiserror::Error;

pub use io::{config_path, load_from, load_or_default, save, save_to_path};
pub use settings::{AnalysisSettings, AppSettings, ModelSettings, TrainingSettings};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Filename of the persisted classifier inside the models directory.
pub const MODEL_FILE_NAME: &str = "model.json";
/// Filename of the reference dataset inside the data directory.
pub const DATASET_FILE_NAME: &str = "soil_measures.csv";

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// App directories could not be resolved.
    #[error("Unable to resolve application directory: {0}")]
    AppDir(#[from] crate::app_dirs::AppDirError),
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}
