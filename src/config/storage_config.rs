//! Storage and artifact configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;

/// Relational store configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cryptopulse.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| Self::default().url),
        }
    }
}

/// Where runs read and write their files
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Directory receiving scraped and processed CSV files
    pub output_dir: PathBuf,
    /// Serialized price model
    pub model_path: PathBuf,
    /// Processed dataset shown in the dashboard's analytics tab
    pub processed_data_path: Option<PathBuf>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            model_path: PathBuf::from("price_prediction_model.json"),
            processed_data_path: None,
        }
    }
}

impl ArtifactConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            processed_data_path: env::var("PROCESSED_DATA_PATH").ok().map(PathBuf::from),
        }
    }
}
