use super::model::PriceModel;
use crate::domain::errors::TrainingError;
use crate::domain::types::FeatureRow;
use tracing::info;

/// One row in this many (rounded up) is held out at the end of the series
const TEST_DIVISOR: usize = 5;

/// A fitted model together with its held-out evaluation
#[derive(Debug)]
pub struct TrainingOutcome {
    pub model: PriceModel,
    pub train_size: usize,
    pub test_size: usize,
    pub mae: f64,
}

/// `(train, test)` sizes of a chronological split with a ceil-rounded test tail
pub fn split_sizes(n: usize) -> (usize, usize) {
    let test = n.div_ceil(TEST_DIVISOR);
    (n - test, test)
}

pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .sum::<f64>()
        / predicted.len() as f64
}

/// Fits the linear price model on the oldest rows and scores it on the newest.
///
/// Rows are used in the order given; no shuffling.
pub fn train(rows: &[FeatureRow]) -> Result<TrainingOutcome, TrainingError> {
    if rows.len() < 2 {
        return Err(TrainingError::InsufficientData { rows: rows.len() });
    }

    let (train_size, test_size) = split_sizes(rows.len());
    let (train_rows, test_rows) = rows.split_at(train_size);
    info!(
        "Chronological split: {} training rows, {} test rows",
        train_size, test_size
    );

    let (x_train, y_train) = to_xy(train_rows);
    let (x_test, y_test) = to_xy(test_rows);

    let mut model = PriceModel::fit(&x_train, &y_train)?;

    let predictions = model
        .predict_batch(&x_test)
        .map_err(|e| TrainingError::Fit {
            reason: e.to_string(),
        })?;
    let mae = mean_absolute_error(&predictions, &y_test);

    model.test_samples = test_size;
    model.mae = Some(mae);

    info!("Mean Absolute Error on test set: {}", format_currency(mae));

    Ok(TrainingOutcome {
        model,
        train_size,
        test_size,
        mae,
    })
}

fn to_xy(rows: &[FeatureRow]) -> (Vec<Vec<f64>>, Vec<f64>) {
    rows.iter()
        .map(|r| (r.input().to_vec(), r.target_close))
        .unzip()
}

/// Formats a dollar amount with thousands separators, e.g. `$1,234.56`
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, frac_part)
}
