//! In-memory stand-ins for the network-facing ports, used by tests and dry runs.

use crate::domain::ports::{MarketDataService, RedditSource, TweetSource};
use crate::domain::types::{Candle, RedditPost, TwitterPost, denormalize_crypto_symbol};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Serves preset candles per symbol, filtered to `open_time >= start`
#[derive(Clone, Default)]
pub struct MockMarketDataService {
    candles: Arc<RwLock<HashMap<String, Vec<Candle>>>>,
    requests: Arc<RwLock<Vec<(String, DateTime<Utc>)>>>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_candles(&self, symbol: &str, candles: Vec<Candle>) {
        self.candles
            .write()
            .await
            .insert(denormalize_crypto_symbol(symbol), candles);
    }

    /// `(symbol, start)` of every call so far
    pub async fn requests(&self) -> Vec<(String, DateTime<Utc>)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_hourly_candles(&self, symbol: &str, start: DateTime<Utc>) -> Result<Vec<Candle>> {
        let symbol = denormalize_crypto_symbol(symbol);
        self.requests.write().await.push((symbol.clone(), start));

        let candles = self.candles.read().await;
        Ok(candles
            .get(&symbol)
            .map(|c| c.iter().filter(|c| c.open_time >= start).cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Clone, Default)]
pub struct MockTweetSource {
    pub tweets: Vec<TwitterPost>,
}

#[async_trait]
impl TweetSource for MockTweetSource {
    async fn search_recent(&self, _query: &str) -> Result<Vec<TwitterPost>> {
        Ok(self.tweets.clone())
    }
}

#[derive(Clone, Default)]
pub struct MockRedditSource {
    pub posts: Vec<RedditPost>,
}

#[async_trait]
impl RedditSource for MockRedditSource {
    async fn hot_posts(&self, _subreddit: &str) -> Result<Vec<RedditPost>> {
        Ok(self.posts.clone())
    }
}
