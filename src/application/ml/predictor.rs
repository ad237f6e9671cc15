use super::model::PriceModel;
use crate::domain::errors::PredictorError;
use crate::domain::types::PredictionInput;
use std::path::{Path, PathBuf};

/// Interface for next-hour price models
pub trait PricePredictor: Send + Sync {
    /// Predicted close of the next hour
    fn predict(&self, input: &PredictionInput) -> Result<f64, PredictorError>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Serves predictions from a [`PriceModel`] persisted by the trainer
#[derive(Debug)]
pub struct LinearPricePredictor {
    model: PriceModel,
    model_path: PathBuf,
}

impl LinearPricePredictor {
    /// Loads the model at `model_path`. A missing file is reported as
    /// [`PredictorError::ModelMissing`] so the caller can tell the user to train first.
    pub fn load(model_path: &Path) -> Result<Self, PredictorError> {
        let model = PriceModel::load(model_path)?;
        Ok(Self {
            model,
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model(&self) -> &PriceModel {
        &self.model
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl PricePredictor for LinearPricePredictor {
    fn predict(&self, input: &PredictionInput) -> Result<f64, PredictorError> {
        self.model.predict(input)
    }

    fn name(&self) -> &str {
        "LinearRegression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_prediction_model.json");

        match LinearPricePredictor::load(&path) {
            Err(PredictorError::ModelMissing { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected ModelMissing, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_predicts_through_trait_object() {
        // close = prev + 10 * posts
        let x: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let i = i as f64;
                vec![i % 5.0, 100.0 + (i * 7.0) % 11.0, 1000.0 + i * 3.0]
            })
            .collect();
        let y: Vec<f64> = x.iter().map(|r| r[2] + 10.0 * r[0]).collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        PriceModel::fit(&x, &y).unwrap().save(&path).unwrap();

        let predictor: Box<dyn PricePredictor> =
            Box::new(LinearPricePredictor::load(&path).unwrap());
        let predicted = predictor
            .predict(&PredictionInput {
                post_count: 2.0,
                volume: 105.0,
                last_hour_close: 60000.0,
            })
            .unwrap();

        assert!((predicted - 60020.0).abs() < 1e-4, "got {}", predicted);
        assert_eq!(predictor.name(), "LinearRegression");
    }
}
