use crate::domain::types::{Candle, HourlyRow};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Counts posts per candle hour and left-joins the counts onto the candles.
///
/// Every candle owns the left-closed window `[open_time, open_time + 1h)`.
/// The output has exactly one row per candle, in candle order; hours without
/// posts get `post_count = 0`. Posts outside every window are dropped.
///
/// `candles` must be sorted by `open_time`. Posts may arrive in any order.
pub fn join_hourly<I>(candles: &[Candle], post_times: I) -> Vec<HourlyRow>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut counts = vec![0u64; candles.len()];
    let mut dropped = 0usize;

    for ts in post_times {
        match bucket_index(candles, ts) {
            Some(idx) => counts[idx] += 1,
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("Dropped {} posts outside the candle time range", dropped);
    }

    candles
        .iter()
        .zip(counts)
        .map(|(candle, count)| HourlyRow::from_candle(candle, count))
        .collect()
}

/// Index of the candle whose window contains `ts`
fn bucket_index(candles: &[Candle], ts: DateTime<Utc>) -> Option<usize> {
    // Number of candles opening at or before ts; the last of them is the only candidate
    let opened = candles.partition_point(|c| c.open_time <= ts);
    let idx = opened.checked_sub(1)?;
    candles[idx].contains(ts).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn h(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
    }

    fn candle(hour: i64, close: f64, volume: f64) -> Candle {
        Candle {
            open_time: h(hour),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    fn counts(rows: &[HourlyRow]) -> Vec<u64> {
        rows.iter().map(|r| r.post_count).collect()
    }

    #[test]
    fn test_single_candle_without_posts() {
        let candles = vec![candle(0, 100.0, 10.0)];
        let rows = join_hourly(&candles, Vec::new());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].post_count, 0);
        assert_eq!(rows[0].close, 100.0);
        assert_eq!(rows[0].volume, 10.0);
    }

    #[test]
    fn test_posts_counted_in_their_hour() {
        let candles = vec![candle(0, 100.0, 10.0), candle(1, 105.0, 12.0)];
        let posts = vec![
            h(1) + Duration::minutes(5),
            h(1) + Duration::minutes(30),
            h(1) + Duration::minutes(59),
        ];

        let rows = join_hourly(&candles, posts);
        assert_eq!(counts(&rows), vec![0, 3]);
    }

    #[test]
    fn test_empty_candles_yield_empty_output() {
        let rows = join_hourly(&[], vec![h(0), h(1)]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_duplicate_timestamps_all_counted() {
        let candles = vec![candle(0, 1.0, 1.0)];
        let ts = h(0) + Duration::minutes(10);
        let rows = join_hourly(&candles, vec![ts, ts, ts, ts]);
        assert_eq!(counts(&rows), vec![4]);
    }

    #[test]
    fn test_right_edge_belongs_to_next_hour() {
        let candles = vec![candle(0, 1.0, 1.0), candle(1, 1.0, 1.0)];
        let rows = join_hourly(&candles, vec![h(1), h(0)]);
        assert_eq!(counts(&rows), vec![1, 1]);
    }

    #[test]
    fn test_posts_outside_range_are_dropped() {
        let candles = vec![candle(5, 1.0, 1.0), candle(6, 1.0, 1.0)];
        let posts = vec![
            h(4) + Duration::minutes(59),
            h(5),
            h(6) + Duration::minutes(59),
            h(7),
            h(100),
        ];

        let rows = join_hourly(&candles, posts);
        assert_eq!(counts(&rows), vec![1, 1]);
    }

    #[test]
    fn test_posts_in_a_gap_between_candles_are_dropped() {
        // Hour 1 is missing from the market data
        let candles = vec![candle(0, 1.0, 1.0), candle(2, 1.0, 1.0)];
        let posts = vec![h(1) + Duration::minutes(15), h(2) + Duration::minutes(1)];

        let rows = join_hourly(&candles, posts);
        assert_eq!(counts(&rows), vec![0, 1]);
    }

    #[test]
    fn test_row_count_and_order_follow_candles() {
        let candles: Vec<Candle> = (0..48).map(|i| candle(i, 100.0 + i as f64, 5.0)).collect();
        // Unsorted posts spread over a wider range than the candles
        let posts: Vec<DateTime<Utc>> = (0..500)
            .map(|i| h(-10) + Duration::minutes((i * 7919) % (70 * 60)))
            .collect();

        let rows = join_hourly(&candles, posts.clone());

        assert_eq!(rows.len(), candles.len());
        for (row, c) in rows.iter().zip(&candles) {
            assert_eq!(row.open_time, c.open_time);
        }

        let in_range = posts
            .iter()
            .filter(|ts| **ts >= h(0) && **ts < h(48))
            .count() as u64;
        assert_eq!(rows.iter().map(|r| r.post_count).sum::<u64>(), in_range);
    }
}
