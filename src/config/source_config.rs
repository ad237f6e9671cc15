//! Data source configuration parsing from environment variables.
//!
//! This module handles loading credentials and endpoints for every
//! external source the collectors talk to:
//! - Twitter API v2 (bearer token)
//! - Reddit (script-app OAuth credentials)
//! - Binance (public market data, no key)

use crate::domain::errors::PipelineError;
use std::env;

/// Twitter API configuration
#[derive(Debug, Clone, Default)]
pub struct TwitterConfig {
    pub bearer_token: Option<String>,
    pub api_url: String,
}

impl TwitterConfig {
    pub fn from_env() -> Self {
        Self {
            bearer_token: non_empty_var("TWITTER_BEARER_TOKEN"),
            api_url: env::var("TWITTER_API_URL")
                .unwrap_or_else(|_| "https://api.twitter.com".to_string()),
        }
    }

    pub fn bearer_token(&self) -> Result<&str, PipelineError> {
        self.bearer_token
            .as_deref()
            .ok_or(PipelineError::MissingCredential {
                name: "TWITTER_BEARER_TOKEN",
            })
    }
}

/// Reddit script-app credentials
#[derive(Debug, Clone, Default)]
pub struct RedditConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub auth_url: String,
    pub api_url: String,
}

/// Resolved Reddit credentials, all present
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl RedditConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: non_empty_var("REDDIT_CLIENT_ID"),
            client_secret: non_empty_var("REDDIT_CLIENT_SECRET"),
            username: non_empty_var("REDDIT_USERNAME"),
            password: non_empty_var("REDDIT_PASSWORD"),
            auth_url: env::var("REDDIT_AUTH_URL")
                .unwrap_or_else(|_| "https://www.reddit.com".to_string()),
            api_url: env::var("REDDIT_API_URL")
                .unwrap_or_else(|_| "https://oauth.reddit.com".to_string()),
        }
    }

    pub fn credentials(&self) -> Result<RedditCredentials, PipelineError> {
        let require = |value: &Option<String>, name: &'static str| {
            value
                .clone()
                .ok_or(PipelineError::MissingCredential { name })
        };

        Ok(RedditCredentials {
            client_id: require(&self.client_id, "REDDIT_CLIENT_ID")?,
            client_secret: require(&self.client_secret, "REDDIT_CLIENT_SECRET")?,
            username: require(&self.username, "REDDIT_USERNAME")?,
            password: require(&self.password, "REDDIT_PASSWORD")?,
        })
    }
}

/// Public Binance REST endpoint
pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";

/// Binance public market data configuration
#[derive(Debug, Clone, Default)]
pub struct BinanceConfig {
    pub base_url: String,
}

impl BinanceConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BINANCE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BINANCE_BASE_URL.to_string()),
        }
    }
}

/// Aggregated source configuration
#[derive(Debug, Clone, Default)]
pub struct SourceEnvConfig {
    pub twitter: TwitterConfig,
    pub reddit: RedditConfig,
    pub binance: BinanceConfig,
}

impl SourceEnvConfig {
    pub fn from_env() -> Self {
        Self {
            twitter: TwitterConfig::from_env(),
            reddit: RedditConfig::from_env(),
            binance: BinanceConfig::from_env(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
