use crate::domain::errors::{PredictorError, TrainingError};
use crate::domain::types::PredictionInput;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

type Regression = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Rank tolerance, relative to the largest centered feature magnitude
const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Serialize, Deserialize)]
enum Fitted {
    /// Ordinary least squares through smartcore's SVD solver
    Ols(Regression),
    /// Minimum-norm least squares, used when there are no more rows than features
    MinimumNorm { intercept: f64, coefficients: Vec<f64> },
}

/// Fitted linear price model plus the facts about how it was trained.
///
/// Serialized as one JSON document. `serde_json` is built with
/// `float_roundtrip`, so a reloaded model predicts bit-identically.
#[derive(Serialize, Deserialize)]
pub struct PriceModel {
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
    pub train_samples: usize,
    pub test_samples: usize,
    /// Mean absolute error on the held-out tail
    pub mae: Option<f64>,
    regression: Fitted,
}

impl fmt::Debug for PriceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceModel")
            .field("feature_names", &self.feature_names)
            .field("trained_at", &self.trained_at)
            .field("train_samples", &self.train_samples)
            .field("test_samples", &self.test_samples)
            .field("mae", &self.mae)
            .finish_non_exhaustive()
    }
}

impl PriceModel {
    /// Fits least squares with an intercept on `x` (one row per sample,
    /// columns in [`PredictionInput::FEATURE_NAMES`] order) against `y`.
    ///
    /// Any non-empty training set fits. With no more rows than features the
    /// system is underdetermined and the minimum-norm solution is returned.
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self, TrainingError> {
        if x.len() != y.len() {
            return Err(TrainingError::Fit {
                reason: format!("{} feature rows but {} targets", x.len(), y.len()),
            });
        }
        if x.is_empty() {
            return Err(TrainingError::InsufficientData { rows: 0 });
        }

        let cols = x[0].len();
        if let Some(row) = x.iter().find(|r| r.len() != cols) {
            return Err(TrainingError::Fit {
                reason: format!("expected {} features per row, got {}", cols, row.len()),
            });
        }

        let regression = if x.len() > cols {
            let x_matrix =
                DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| TrainingError::Fit {
                    reason: format!("Matrix error: {}", e),
                })?;
            let params =
                LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::SVD);

            let ols = LinearRegression::fit(&x_matrix, &y.to_vec(), params).map_err(|e| {
                TrainingError::Fit {
                    reason: e.to_string(),
                }
            })?;
            Fitted::Ols(ols)
        } else {
            info!(
                "{} training rows for {} features, using the minimum-norm solution",
                x.len(),
                cols
            );
            let (intercept, coefficients) = minimum_norm_fit(x, y)?;
            Fitted::MinimumNorm {
                intercept,
                coefficients,
            }
        };

        Ok(Self {
            feature_names: PredictionInput::FEATURE_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            trained_at: Utc::now(),
            train_samples: x.len(),
            test_samples: 0,
            mae: None,
            regression,
        })
    }

    pub fn predict_batch(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, PredictorError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }

        match &self.regression {
            Fitted::Ols(regression) => {
                let matrix = DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| {
                    PredictorError::Prediction {
                        reason: format!("Matrix creation failed: {}", e),
                    }
                })?;
                regression
                    .predict(&matrix)
                    .map_err(|e| PredictorError::Prediction {
                        reason: e.to_string(),
                    })
            }
            Fitted::MinimumNorm {
                intercept,
                coefficients,
            } => x
                .iter()
                .map(|row| {
                    if row.len() != coefficients.len() {
                        return Err(PredictorError::Prediction {
                            reason: format!(
                                "expected {} features, got {}",
                                coefficients.len(),
                                row.len()
                            ),
                        });
                    }
                    Ok(intercept + dot(row, coefficients))
                })
                .collect(),
        }
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<f64, PredictorError> {
        self.predict_batch(&[input.to_vec()])?
            .first()
            .copied()
            .ok_or_else(|| PredictorError::Prediction {
                reason: "No prediction returned".to_string(),
            })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create model directory {:?}", parent))?;
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create model file {:?}", path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).context("Failed to serialize model")?;
        writer.flush()?;

        info!("Saved price model to {:?}", path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        if !path.exists() {
            return Err(PredictorError::ModelMissing {
                path: path.to_path_buf(),
            });
        }

        let corrupt = |reason: String| PredictorError::ModelCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| corrupt(e.to_string()))?;
        let model: PriceModel =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| corrupt(e.to_string()))?;

        info!(
            "Successfully loaded price model from {:?} (trained {} on {} samples)",
            path,
            model.trained_at.format("%Y-%m-%d %H:%M"),
            model.train_samples
        );
        Ok(model)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Least squares with an intercept whose coefficient vector has the smallest norm.
///
/// Features and target are centered. The coefficients are searched for inside
/// the span of the centered rows (orthonormalised by Gram-Schmidt), which is
/// where the minimum-norm solution lives, and the reduced normal equations are
/// solved there. Returns `(intercept, coefficients)`.
fn minimum_norm_fit(x: &[Vec<f64>], y: &[f64]) -> Result<(f64, Vec<f64>), TrainingError> {
    let n = x.len() as f64;
    let cols = x[0].len();

    let x_mean: Vec<f64> = (0..cols)
        .map(|j| x.iter().map(|r| r[j]).sum::<f64>() / n)
        .collect();
    let y_mean = y.iter().sum::<f64>() / n;

    let centered: Vec<Vec<f64>> = x
        .iter()
        .map(|r| r.iter().zip(&x_mean).map(|(v, m)| v - m).collect())
        .collect();
    let y_centered: Vec<f64> = y.iter().map(|v| v - y_mean).collect();

    let scale = centered
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale * RANK_TOLERANCE;

    let mut basis: Vec<Vec<f64>> = Vec::new();
    for row in &centered {
        let mut v = row.clone();
        for q in &basis {
            let d = dot(&v, q);
            v.iter_mut().zip(q).for_each(|(vi, qi)| *vi -= d * qi);
        }
        let norm = dot(&v, &v).sqrt();
        if norm > tolerance {
            basis.push(v.into_iter().map(|vi| vi / norm).collect());
        }
    }

    // Rows expressed in the basis: a[i][l] = <row_i, q_l>
    let reduced: Vec<Vec<f64>> = centered
        .iter()
        .map(|r| basis.iter().map(|q| dot(r, q)).collect())
        .collect();

    let rank = basis.len();
    let mut normal = vec![vec![0.0; rank]; rank];
    let mut rhs = vec![0.0; rank];
    for (row, target) in reduced.iter().zip(&y_centered) {
        for l in 0..rank {
            rhs[l] += row[l] * target;
            for k in 0..rank {
                normal[l][k] += row[l] * row[k];
            }
        }
    }

    let weights = solve_linear_system(normal, rhs).ok_or_else(|| TrainingError::Fit {
        reason: "singular normal equations".to_string(),
    })?;

    let mut coefficients = vec![0.0; cols];
    for (w, q) in weights.iter().zip(&basis) {
        coefficients
            .iter_mut()
            .zip(q)
            .for_each(|(c, qi)| *c += w * qi);
    }
    let intercept = y_mean - dot(&x_mean, &coefficients);

    Ok((intercept, coefficients))
}

/// Gaussian elimination with partial pivoting; `None` on a zero pivot
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col] == 0.0 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * solution[k]).sum();
        solution[row] = (b[row] - tail) / a[row][row];
    }
    Some(solution)
}
