use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{name} not set")]
    MissingCredential { name: &'static str },

    #[error("{service} API error: {status} {body}")]
    ExternalService {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("File not found at {}", path.display())]
    MissingInput { path: PathBuf },
}

/// Errors raised while fitting the price model
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Not enough data to train a model: {rows} usable rows (need at least 2)")]
    InsufficientData { rows: usize },

    #[error("Model fitting failed: {reason}")]
    Fit { reason: String },
}

/// Errors surfaced by the predictor to its caller
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Model file not found at {}. Run `train` first", path.display())]
    ModelMissing { path: PathBuf },

    #[error("Model file at {} could not be loaded: {reason}", path.display())]
    ModelCorrupt { path: PathBuf, reason: String },

    #[error("Prediction failed: {reason}")]
    Prediction { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_service_formatting() {
        let error = PipelineError::ExternalService {
            service: "Twitter",
            status: 401,
            body: "Unauthorized".to_string(),
        };

        let msg = error.to_string();
        assert_eq!(msg, "Twitter API error: 401 Unauthorized");
    }

    #[test]
    fn test_missing_credential_formatting() {
        let error = PipelineError::MissingCredential {
            name: "TWITTER_BEARER_TOKEN",
        };
        assert_eq!(error.to_string(), "TWITTER_BEARER_TOKEN not set");
    }

    #[test]
    fn test_model_missing_mentions_path() {
        let error = PredictorError::ModelMissing {
            path: PathBuf::from("models/price.json"),
        };
        assert!(error.to_string().contains("models/price.json"));
    }
}
