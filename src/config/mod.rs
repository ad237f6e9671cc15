//! Configuration module for cryptopulse.
//!
//! Configuration is read from environment variables exactly once, at the start
//! of a run, and handed to each collaborator at construction. Nothing below
//! this module reads the process environment.

mod http_config;
mod source_config;
mod storage_config;

pub use http_config::HttpConfig;
pub use source_config::{
    BinanceConfig, DEFAULT_BINANCE_BASE_URL, RedditConfig, RedditCredentials, SourceEnvConfig,
    TwitterConfig,
};
pub use storage_config::{ArtifactConfig, DatabaseConfig};

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub twitter: TwitterConfig,
    pub reddit: RedditConfig,
    pub binance: BinanceConfig,
    pub database: DatabaseConfig,
    pub http: HttpConfig,
    pub artifacts: ArtifactConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing credentials are not an error here: each collector checks for
    /// the credentials it needs when it is built, so a run only fails for the
    /// sources it actually uses.
    pub fn from_env() -> Result<Self> {
        let sources = SourceEnvConfig::from_env();
        let http = HttpConfig::from_env().context("Failed to load HTTP config")?;

        Ok(Self {
            twitter: sources.twitter,
            reddit: sources.reddit,
            binance: sources.binance,
            database: DatabaseConfig::from_env(),
            http,
            artifacts: ArtifactConfig::from_env(),
        })
    }

    /// Same as [`Config::from_env`], after loading a `.env` file if present.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        let config = Config::from_env().expect("Should parse with defaults");
        assert!(config.binance.base_url.starts_with("https://"));
        assert!(config.reddit.api_url.contains("reddit.com"));
        assert!(config.twitter.api_url.contains("twitter.com"));
    }

    #[test]
    fn test_default_http_config_is_single_attempt() {
        let config = Config::default();
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.http.timeout_secs, 30);
    }
}
