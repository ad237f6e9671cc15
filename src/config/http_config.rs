//! Outbound HTTP client configuration.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Retries on transient failures. Zero means a single attempt.
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 0,
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse::<u64>()
                .context("Failed to parse HTTP_TIMEOUT_SECS")?,
            connect_timeout_secs: defaults.connect_timeout_secs,
            max_retries: env::var("HTTP_MAX_RETRIES")
                .unwrap_or_else(|_| defaults.max_retries.to_string())
                .parse::<u32>()
                .context("Failed to parse HTTP_MAX_RETRIES")?,
        })
    }
}
