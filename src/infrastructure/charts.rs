//! PNG renderings of the analyzer's chart series.
//!
//! Built on plotters' bitmap backend without a font feature, so axis text is
//! laid out but not rasterised; the lines and markers carry the information.

use crate::application::analytics::{ScatterPoint, TimePoint};
use anyhow::{Result, anyhow};
use plotters::prelude::*;
use std::error::Error;
use std::ops::Range;
use std::path::Path;
use tracing::info;

pub const TIME_SERIES_FILE: &str = "price_vs_posts_timeseries.png";
pub const SCATTER_FILE: &str = "posts_vs_price_change_scatter.png";

const CHART_SIZE: (u32, u32) = (1200, 600);

/// Close price (left axis) and post count (right axis) per hour.
pub fn write_time_series_png(path: &Path, points: &[TimePoint]) -> Result<()> {
    draw_time_series(path, points).map_err(|e| anyhow!("Failed to render {:?}: {}", path, e))?;
    info!("Saved plot to {:?}", path);
    Ok(())
}

/// Post count against the following price change.
pub fn write_scatter_png(path: &Path, points: &[ScatterPoint]) -> Result<()> {
    draw_scatter(path, points).map_err(|e| anyhow!("Failed to render {:?}: {}", path, e))?;
    info!("Saved plot to {:?}", path);
    Ok(())
}

fn draw_time_series(path: &Path, points: &[TimePoint]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let hours: Vec<f64> = match points.first() {
        Some(first) => points
            .iter()
            .map(|p| (p.open_time - first.open_time).num_seconds() as f64 / 3600.0)
            .collect(),
        None => Vec::new(),
    };
    let x_range = padded_range(hours.iter().copied());

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .right_y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), padded_range(points.iter().map(|p| p.close)))?
        .set_secondary_coord(x_range, padded_range(points.iter().map(|p| p.post_count)));

    chart
        .configure_mesh()
        .x_desc("Hours since first candle")
        .y_desc("Close")
        .draw()?;
    chart.configure_secondary_axes().y_desc("Posts").draw()?;

    chart.draw_series(LineSeries::new(
        hours.iter().zip(points).map(|(h, p)| (*h, p.close)),
        &BLUE,
    ))?;
    chart.draw_secondary_series(LineSeries::new(
        hours.iter().zip(points).map(|(h, p)| (*h, p.post_count)),
        &RED,
    ))?;

    root.present()?;
    Ok(())
}

fn draw_scatter(path: &Path, points: &[ScatterPoint]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            padded_range(points.iter().map(|p| p.post_count)),
            padded_range(points.iter().map(|p| p.price_change)),
        )?;

    chart
        .configure_mesh()
        .x_desc("Posts")
        .y_desc("Price change")
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p.post_count, p.price_change), 4, BLUE.mix(0.6).filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Axis range over the finite values with 5% headroom; `0..1` when there are none
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::analytics::analyze;
    use crate::domain::types::HourlyRow;
    use chrono::{Duration, TimeZone, Utc};

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn rows() -> Vec<HourlyRow> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        [(42000.0, 3), (42150.5, 7), (41980.0, 2), (42300.0, 11), (42310.0, 0)]
            .iter()
            .enumerate()
            .map(|(i, &(close, post_count))| HourlyRow {
                open_time: start + Duration::hours(i as i64),
                open: close,
                high: close + 10.0,
                low: close - 10.0,
                close,
                volume: 100.0 + i as f64,
                post_count,
            })
            .collect()
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.len() > PNG_SIGNATURE.len(), "{:?} is empty", path);
        assert_eq!(&bytes[..PNG_SIGNATURE.len()], PNG_SIGNATURE);
    }

    #[test]
    fn test_writes_both_charts() {
        let dir = tempfile::tempdir().unwrap();
        let report = analyze(&rows());

        let series = dir.path().join(TIME_SERIES_FILE);
        let scatter = dir.path().join(SCATTER_FILE);
        write_time_series_png(&series, &report.time_series).unwrap();
        write_scatter_png(&scatter, &report.scatter).unwrap();

        assert_png(&series);
        assert_png(&scatter);
    }

    #[test]
    fn test_empty_series_still_render() {
        let dir = tempfile::tempdir().unwrap();
        let series = dir.path().join(TIME_SERIES_FILE);
        let scatter = dir.path().join(SCATTER_FILE);

        write_time_series_png(&series, &[]).unwrap();
        write_scatter_png(&scatter, &[]).unwrap();

        assert_png(&series);
        assert_png(&scatter);
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
        assert_eq!(padded_range([5.0, 5.0].into_iter()), 4.0..6.0);
        assert_eq!(padded_range([0.0, f64::NAN, 10.0].into_iter()), -0.5..10.5);
    }
}
