//! Configuration management for the CLI
//!
//! Layers, lowest to highest: built-in defaults, the JSON config file,
//! `HRP_*` environment variables. Command-line flags are applied on top
//! by the caller.

use anyhow::{Context, Result};
use risk_lib::artifact::{DEFAULT_METADATA_PATH, DEFAULT_MODEL_PATH};
use risk_lib::ArtifactPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Classifier artifact path
    pub model_path: PathBuf,
    /// Metadata descriptor path
    pub metadata_path: PathBuf,
    /// Show raw probability and threshold after each prediction
    pub show_details: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            show_details: true,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(file_override: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("model_path", defaults.model_path.to_string_lossy().into_owned())?
            .set_default("metadata_path", defaults.metadata_path.to_string_lossy().into_owned())?
            .set_default("show_details", defaults.show_details)?;

        // An explicitly named file must exist; the default location is optional
        let file = match file_override {
            Some(path) => Some((path.to_path_buf(), true)),
            None => Self::config_path().map(|path| (path, false)),
        };
        if let Some((path, required)) = file {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(required),
            );
        }

        builder
            .add_source(config::Environment::with_prefix("HRP"))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("hrp").join("config.json"))
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model_path, &self.metadata_path)
    }
}
