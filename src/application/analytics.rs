use crate::domain::types::HourlyRow;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use statrs::statistics::Statistics;
use std::path::{Path, PathBuf};
use tracing::info;

pub const COLUMNS: [&str; 4] = ["close", "volume", "post_count", "price_change"];

/// Point of the close / post count time-series chart
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    pub open_time: DateTime<Utc>,
    pub close: f64,
    pub post_count: f64,
}

/// Point of the post count / price change scatter chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub post_count: f64,
    pub price_change: f64,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Pearson correlations indexed like [`COLUMNS`]
    pub correlation: [[f64; 4]; 4],
    pub time_series: Vec<TimePoint>,
    pub scatter: Vec<ScatterPoint>,
}

impl AnalysisReport {
    pub fn correlation_between(&self, a: &str, b: &str) -> Option<f64> {
        let i = COLUMNS.iter().position(|c| *c == a)?;
        let j = COLUMNS.iter().position(|c| *c == b)?;
        Some(self.correlation[i][j])
    }

    pub fn log_matrix(&self) {
        info!("Correlation Matrix:");
        info!(
            "{:>14} {}",
            "",
            COLUMNS.map(|c| format!("{:>13}", c)).join(" ")
        );
        for (name, row) in COLUMNS.iter().zip(&self.correlation) {
            let cells: Vec<String> = row.iter().map(|v| format!("{:>13.4}", v)).collect();
            info!("{:>14} {}", name, cells.join(" "));
        }
    }
}

/// First difference of close; `None` for the first row
pub fn price_changes(rows: &[HourlyRow]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(rows.len());
    let mut previous: Option<f64> = None;
    for row in rows {
        changes.push(previous.map(|p| row.close - p));
        previous = Some(row.close);
    }
    changes
}

/// Correlation matrix and chart series for the joined hourly data.
pub fn analyze(rows: &[HourlyRow]) -> AnalysisReport {
    let changes = price_changes(rows);

    let columns: [Vec<Option<f64>>; 4] = [
        rows.iter().map(|r| Some(r.close)).collect(),
        rows.iter().map(|r| Some(r.volume)).collect(),
        rows.iter().map(|r| Some(r.post_count as f64)).collect(),
        changes.clone(),
    ];

    let mut correlation = [[f64::NAN; 4]; 4];
    for i in 0..4 {
        for j in i..4 {
            let corr = pairwise_pearson(&columns[i], &columns[j]);
            correlation[i][j] = corr;
            correlation[j][i] = corr;
        }
    }

    let time_series = rows
        .iter()
        .map(|r| TimePoint {
            open_time: r.open_time,
            close: r.close,
            post_count: r.post_count as f64,
        })
        .collect();

    let scatter = rows
        .iter()
        .zip(&changes)
        .filter_map(|(r, change)| {
            change.map(|price_change| ScatterPoint {
                post_count: r.post_count as f64,
                price_change,
            })
        })
        .collect();

    AnalysisReport {
        correlation,
        time_series,
        scatter,
    }
}

/// Pearson correlation over the rows where both values are present.
///
/// NaN when fewer than two complete rows remain or either side is constant.
fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    let sd_x = xs.iter().std_dev();
    let sd_y = ys.iter().std_dev();
    if sd_x == 0.0 || sd_y == 0.0 {
        return f64::NAN;
    }

    xs.iter().covariance(ys.iter()) / (sd_x * sd_y)
}

/// `<dir>/<stem>_correlation.csv` next to the analysed file
pub fn correlation_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    input.with_file_name(format!("{}_correlation.csv", stem))
}

pub fn write_correlation_csv(path: &Path, report: &AnalysisReport) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;

    let mut header = vec![String::new()];
    header.extend(COLUMNS.iter().map(|c| c.to_string()));
    writer.write_record(&header)?;

    for (name, row) in COLUMNS.iter().zip(&report.correlation) {
        let mut record = vec![name.to_string()];
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!("Correlation matrix written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn rows(closes: &[f64], volumes: &[f64], posts: &[u64]) -> Vec<HourlyRow> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .zip(volumes)
            .zip(posts)
            .enumerate()
            .map(|(i, ((&close, &volume), &post_count))| HourlyRow {
                open_time: start + Duration::hours(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume,
                post_count,
            })
            .collect()
    }

    #[test]
    fn test_price_change_is_first_difference() {
        let data = rows(&[100.0, 105.0, 103.0], &[1.0; 3], &[0; 3]);
        assert_eq!(price_changes(&data), vec![None, Some(5.0), Some(-2.0)]);
    }

    #[test]
    fn test_diagonal_is_one() {
        let data = rows(
            &[100.0, 102.0, 101.0, 107.0, 104.0],
            &[10.0, 30.0, 20.0, 50.0, 40.0],
            &[1, 4, 2, 9, 3],
        );
        let report = analyze(&data);
        for i in 0..4 {
            assert!((report.correlation[i][i] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_matrix_is_symmetric_and_detects_linear_relation() {
        let data = rows(
            &[100.0, 102.0, 101.0, 107.0, 104.0],
            &[10.0, 30.0, 20.0, 50.0, 40.0],
            &[1, 3, 2, 5, 4],
        );
        let report = analyze(&data);

        // post_count = volume / 10
        let corr = report.correlation_between("volume", "post_count").unwrap();
        assert!((corr - 1.0).abs() < 1e-12);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(
                    report.correlation[i][j].to_bits(),
                    report.correlation[j][i].to_bits()
                );
            }
        }
    }

    #[test]
    fn test_constant_column_is_nan() {
        let data = rows(&[1.0, 2.0, 4.0], &[5.0, 5.0, 5.0], &[0, 1, 3]);
        let report = analyze(&data);
        assert!(report.correlation_between("volume", "close").unwrap().is_nan());
        assert!(report.correlation_between("volume", "volume").unwrap().is_nan());
    }

    #[test]
    fn test_price_change_uses_complete_pairs_only() {
        // Changes: -, 1, 3, 6 ; posts: 9, 1, 3, 6
        let data = rows(&[0.0, 1.0, 4.0, 10.0], &[1.0, 2.0, 3.0, 5.0], &[9, 1, 3, 6]);
        let report = analyze(&data);

        let corr = report.correlation_between("post_count", "price_change").unwrap();
        assert!((corr - 1.0).abs() < 1e-12, "got {}", corr);
        assert_eq!(report.scatter.len(), 3);
        assert_eq!(report.time_series.len(), 4);
    }

    #[test]
    fn test_output_path_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("processed_BTCUSDT_data.csv");
        let output = correlation_output_path(&input);
        assert_eq!(
            output.file_name().unwrap(),
            "processed_BTCUSDT_data_correlation.csv"
        );

        let data = rows(&[1.0, 2.0, 4.0], &[5.0, 5.0, 5.0], &[0, 1, 3]);
        write_correlation_csv(&output, &analyze(&data)).unwrap();
        let raw = std::fs::read_to_string(&output).unwrap();
        assert!(raw.starts_with(",close,volume,post_count,price_change\n"));
        assert!(raw.contains("NaN"));
        assert_eq!(raw.lines().count(), 5);
    }
}
