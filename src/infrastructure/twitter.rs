//! Twitter API v2 recent-search collector.

use crate::config::{HttpConfig, TwitterConfig};
use crate::domain::errors::PipelineError;
use crate::domain::ports::TweetSource;
use crate::domain::types::TwitterPost;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::info;

const MAX_RESULTS: &str = "100";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<TweetData>>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    author_id: String,
    created_at: DateTime<Utc>,
    text: String,
    public_metrics: PublicMetrics,
}

#[derive(Debug, Deserialize)]
struct PublicMetrics {
    like_count: i64,
    retweet_count: i64,
}

pub struct TwitterCollector {
    client: ClientWithMiddleware,
    api_url: String,
    bearer_token: String,
}

impl TwitterCollector {
    /// Fails with `MissingCredential` when no bearer token is configured.
    pub fn new(config: &TwitterConfig, http: &HttpConfig) -> Result<Self, PipelineError> {
        let bearer_token = config.bearer_token()?.to_string();
        Ok(Self {
            client: HttpClientFactory::create_client(http),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bearer_token,
        })
    }
}

#[async_trait]
impl TweetSource for TwitterCollector {
    async fn search_recent(&self, query: &str) -> Result<Vec<TwitterPost>> {
        info!("--> Searching Twitter for: '{}'", query);

        let url = build_url_with_query(
            &format!("{}/2/tweets/search/recent", self.api_url),
            &[
                ("query", query),
                ("tweet.fields", "created_at,author_id,public_metrics"),
                ("max_results", MAX_RESULTS),
            ],
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.bearer_token))
            .send()
            .await
            .context("Failed to reach the Twitter API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ExternalService {
                service: "Twitter",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Twitter search response")?;

        Ok(into_posts(body))
    }
}

fn into_posts(body: SearchResponse) -> Vec<TwitterPost> {
    body.data
        .unwrap_or_default()
        .into_iter()
        .map(|t| TwitterPost {
            id: t.id,
            author_id: t.author_id,
            created_at: t.created_at,
            text: t.text,
            likes: t.public_metrics.like_count,
            retweets: t.public_metrics.retweet_count,
        })
        .collect()
}

/// File name used for a query's scrape output
pub fn output_file_name(query: &str) -> String {
    format!("{}_twitter.csv", query.replace(' ', "_"))
}
