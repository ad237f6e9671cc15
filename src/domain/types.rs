use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social platform a post was collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Twitter,
    Reddit,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Twitter => write!(f, "twitter"),
            Platform::Reddit => write!(f, "reddit"),
        }
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twitter" => Ok(Platform::Twitter),
            "reddit" => Ok(Platform::Reddit),
            _ => anyhow::bail!(
                "Invalid platform: {}. Please choose 'twitter' or 'reddit'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterPost {
    pub id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub likes: i64,
    pub retweets: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub score: i64,
    pub url: String,
    pub num_comments: i64,
    pub created_utc: DateTime<Utc>,
}

/// Platform-neutral view of a stored post, as read back for aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
    pub text: String,
}

impl From<&TwitterPost> for SocialPost {
    fn from(post: &TwitterPost) -> Self {
        Self {
            platform: Platform::Twitter,
            created_at: post.created_at,
            text: post.text.clone(),
        }
    }
}

impl From<&RedditPost> for SocialPost {
    fn from(post: &RedditPost) -> Self {
        Self {
            platform: Platform::Reddit,
            created_at: post.created_utc,
            text: post.title.clone(),
        }
    }
}

/// One hour of trading, keyed by its open time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// End of the left-closed window `[open_time, open_time + 1h)` owned by this candle
    pub fn close_time(&self) -> DateTime<Utc> {
        self.open_time + Duration::hours(1)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.open_time && ts < self.close_time()
    }
}

/// A market candle joined with the number of social posts in the same hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRow {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub post_count: u64,
}

impl HourlyRow {
    pub fn from_candle(candle: &Candle, post_count: u64) -> Self {
        Self {
            open_time: candle.open_time,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            post_count,
        }
    }
}

/// Model input plus the value it should predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub open_time: DateTime<Utc>,
    pub post_count: f64,
    pub volume: f64,
    pub last_hour_close: f64,
    pub target_close: f64,
}

impl FeatureRow {
    pub fn input(&self) -> PredictionInput {
        PredictionInput {
            post_count: self.post_count,
            volume: self.volume,
            last_hour_close: self.last_hour_close,
        }
    }
}

/// The three model features, in training column order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub post_count: f64,
    pub volume: f64,
    pub last_hour_close: f64,
}

impl PredictionInput {
    pub const FEATURE_NAMES: [&'static str; 3] = [
        "feature_post_count",
        "feature_volume",
        "feature_last_hour_close",
    ];

    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.post_count, self.volume, self.last_hour_close]
    }
}

/// Converts a symbol to Binance's API format ("BTC/USDT" -> "BTCUSDT").
///
/// # Examples
/// ```
/// use cryptopulse::domain::types::denormalize_crypto_symbol;
///
/// assert_eq!(denormalize_crypto_symbol("BTC/USDT"), "BTCUSDT");
/// assert_eq!(denormalize_crypto_symbol("ethusdt"), "ETHUSDT");
/// ```
pub fn denormalize_crypto_symbol(symbol: &str) -> String {
    symbol.replace('/', "").trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_platform_parsing() {
        assert_eq!(Platform::from_str("Twitter").unwrap(), Platform::Twitter);
        assert_eq!(Platform::from_str("REDDIT").unwrap(), Platform::Reddit);
        assert!(Platform::from_str("mastodon").is_err());
    }

    #[test]
    fn test_candle_window_is_left_closed() {
        let open_time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let candle = Candle {
            open_time,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1.0,
        };

        assert!(candle.contains(open_time));
        assert!(candle.contains(open_time + Duration::minutes(59)));
        assert!(!candle.contains(open_time + Duration::hours(1)));
        assert!(!candle.contains(open_time - Duration::seconds(1)));
    }
}
