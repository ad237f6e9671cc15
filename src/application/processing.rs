use crate::application::aggregation::join_hourly;
use crate::domain::ports::MarketDataService;
use crate::domain::repositories::PostRepository;
use crate::domain::types::{HourlyRow, denormalize_crypto_symbol};
use crate::infrastructure::csv_store;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Parses a `YYYY-MM-DD` start date as midnight UTC
pub fn parse_start_date(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid start date '{}', expected YYYY-MM-DD", value))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// `processed_<SYMBOL>_data.csv` inside `output_dir`
pub fn processed_file_path(output_dir: &Path, symbol: &str) -> PathBuf {
    output_dir.join(format!(
        "processed_{}_data.csv",
        denormalize_crypto_symbol(symbol)
    ))
}

/// Joins stored social activity with hourly market data
pub struct ProcessingService {
    repository: Arc<dyn PostRepository>,
    market_data: Arc<dyn MarketDataService>,
    output_dir: PathBuf,
}

impl ProcessingService {
    pub fn new(
        repository: Arc<dyn PostRepository>,
        market_data: Arc<dyn MarketDataService>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            repository,
            market_data,
            output_dir,
        }
    }

    /// Runs the join for `symbol` from `start` and writes the processed CSV.
    pub async fn run(&self, symbol: &str, start: DateTime<Utc>) -> Result<Vec<HourlyRow>> {
        let posts = self
            .repository
            .fetch_social_posts()
            .await
            .context("Failed to read stored social posts")?;
        info!("Fetched {} social media posts from the database", posts.len());

        let candles = self
            .market_data
            .get_hourly_candles(symbol, start)
            .await
            .with_context(|| format!("Failed to fetch market data for {}", symbol))?;

        if candles.is_empty() {
            warn!("No market data returned for {} since {}", symbol, start.date_naive());
        }

        let rows = join_hourly(&candles, posts.iter().map(|p| p.created_at));
        let with_posts = rows.iter().filter(|r| r.post_count > 0).count();
        info!(
            "Joined {} hourly rows ({} with social activity)",
            rows.len(),
            with_posts
        );

        let path = processed_file_path(&self.output_dir, symbol);
        csv_store::write_hourly_rows(&path, &rows)?;
        info!("Processed data saved to {:?}", path);

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_start_date() {
        assert_eq!(
            parse_start_date("2024-05-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_start_date("05/01/2024").is_err());
    }

    #[test]
    fn test_processed_file_path_uses_api_symbol() {
        assert_eq!(
            processed_file_path(Path::new("out"), "btc/usdt"),
            Path::new("out").join("processed_BTCUSDT_data.csv")
        );
    }
}
