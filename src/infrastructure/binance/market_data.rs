//! Binance Market Data Service
//!
//! Fetches historical hourly candles (klines) from Binance's public REST API.
//! No API key is needed for market data.

use crate::config::{BinanceConfig, DEFAULT_BINANCE_BASE_URL, HttpConfig};
use crate::domain::errors::PipelineError;
use crate::domain::ports::MarketDataService;
use crate::domain::types::{Candle, denormalize_crypto_symbol};
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, warn};

/// Binance caps a klines page at 1000 entries
const KLINES_PAGE_LIMIT: usize = 1000;

pub struct BinanceMarketDataService {
    client: ClientWithMiddleware,
    base_url: String,
}

impl BinanceMarketDataService {
    pub fn builder() -> BinanceMarketDataServiceBuilder {
        BinanceMarketDataServiceBuilder::default()
    }

    pub fn new(config: &BinanceConfig, http: &HttpConfig) -> Self {
        Self::builder()
            .base_url(config.base_url.clone())
            .http_config(http.clone())
            .build()
    }

    async fn fetch_klines_page(
        &self,
        api_symbol: &str,
        start_ms: i64,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let start_ms_str = start_ms.to_string();
        let limit_str = KLINES_PAGE_LIMIT.to_string();

        let url_with_query = build_url_with_query(
            &url,
            &[
                ("symbol", api_symbol),
                ("interval", "1h"),
                ("startTime", &start_ms_str),
                ("limit", &limit_str),
            ],
        );

        let response = self
            .client
            .get(&url_with_query)
            .send()
            .await
            .context("Failed to fetch klines from Binance")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ExternalService {
                service: "Binance",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        // Binance klines format: [open_time, open, high, low, close, volume, close_time, ...]
        let klines: Vec<serde_json::Value> = response
            .json()
            .await
            .context("Failed to parse Binance klines response")?;

        Ok(parse_klines(&klines))
    }
}

#[derive(Default)]
pub struct BinanceMarketDataServiceBuilder {
    base_url: Option<String>,
    http_config: Option<HttpConfig>,
}

impl BinanceMarketDataServiceBuilder {
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = Some(http_config);
        self
    }

    pub fn build(self) -> BinanceMarketDataService {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BINANCE_BASE_URL.to_string());
        let client = HttpClientFactory::create_client(&self.http_config.unwrap_or_default());

        BinanceMarketDataService {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MarketDataService for BinanceMarketDataService {
    async fn get_hourly_candles(&self, symbol: &str, start: DateTime<Utc>) -> Result<Vec<Candle>> {
        let api_symbol = denormalize_crypto_symbol(symbol);
        info!(
            "BinanceMarketDataService: Fetching hourly klines for {} since {}",
            api_symbol,
            start.format("%Y-%m-%d %H:%M")
        );

        let mut candles: Vec<Candle> = Vec::new();
        let mut start_ms = start.timestamp_millis();

        loop {
            let page = self.fetch_klines_page(&api_symbol, start_ms).await?;
            let page_len = page.len();
            debug!(
                "BinanceMarketDataService: Page from {} returned {} klines",
                start_ms, page_len
            );

            let Some(last) = page.last() else {
                break;
            };
            start_ms = (last.open_time + Duration::hours(1)).timestamp_millis();
            candles.extend(page);

            if page_len < KLINES_PAGE_LIMIT {
                break;
            }
        }

        info!(
            "BinanceMarketDataService: Found {} hourly market data records for {}",
            candles.len(),
            api_symbol
        );

        Ok(candles)
    }
}

/// Converts raw kline arrays into candles, skipping malformed entries.
pub fn parse_klines(klines: &[serde_json::Value]) -> Vec<Candle> {
    let mut skipped = 0usize;
    let candles: Vec<Candle> = klines
        .iter()
        .filter_map(|k| {
            let candle = parse_kline(k);
            if candle.is_none() {
                skipped += 1;
            }
            candle
        })
        .collect();

    if skipped > 0 {
        warn!("BinanceMarketDataService: Skipped {} malformed klines", skipped);
    }
    candles
}

fn parse_kline(kline: &serde_json::Value) -> Option<Candle> {
    let arr = kline.as_array()?;
    if arr.len() < 6 {
        return None;
    }

    let open_time = DateTime::from_timestamp_millis(arr[0].as_i64()?)?;
    // Prices and volumes arrive as decimal strings
    let field = |i: usize| arr[i].as_str()?.parse::<f64>().ok();

    Some(Candle {
        open_time,
        open: field(1)?,
        high: field(2)?,
        low: field(3)?,
        close: field(4)?,
        volume: field(5)?,
    })
}
