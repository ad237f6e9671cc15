use crate::domain::types::{FeatureRow, HourlyRow};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Derives `(post_count, volume, last_hour_close) -> close` rows.
///
/// The previous close is looked up by timestamp (`open_time - 1h`), so a
/// missing hour in the input drops the row after the gap instead of pairing
/// it with an older close. The first hour of any series has no previous
/// close and is always dropped. Output keeps input order.
pub fn build_features(rows: &[HourlyRow]) -> Vec<FeatureRow> {
    let close_by_hour: HashMap<DateTime<Utc>, f64> =
        rows.iter().map(|r| (r.open_time, r.close)).collect();

    let features: Vec<FeatureRow> = rows
        .iter()
        .filter_map(|row| {
            let last_hour_close = *close_by_hour.get(&(row.open_time - Duration::hours(1)))?;
            Some(FeatureRow {
                open_time: row.open_time,
                post_count: row.post_count as f64,
                volume: row.volume,
                last_hour_close,
                target_close: row.close,
            })
        })
        .collect();

    debug!(
        "Built {} feature rows from {} hourly rows",
        features.len(),
        rows.len()
    );
    features
}
