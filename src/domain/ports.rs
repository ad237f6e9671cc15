use crate::domain::types::{Candle, RedditPost, TwitterPost};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// Need async_trait for async functions in traits
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Hourly candles for `symbol` from `start` up to the latest closed hour,
    /// in chronological order
    async fn get_hourly_candles(&self, symbol: &str, start: DateTime<Utc>) -> Result<Vec<Candle>>;
}

#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Recent tweets matching `query`. An empty result is not an error.
    async fn search_recent(&self, query: &str) -> Result<Vec<TwitterPost>>;
}

#[async_trait]
pub trait RedditSource: Send + Sync {
    /// Current "hot" listing of a subreddit
    async fn hot_posts(&self, subreddit: &str) -> Result<Vec<RedditPost>>;
}
