//! Reddit collector using a script-app OAuth token.

use crate::config::{HttpConfig, RedditConfig, RedditCredentials};
use crate::domain::errors::PipelineError;
use crate::domain::ports::RedditSource;
use crate::domain::types::RedditPost;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, build_url_with_query, encode_form_body,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, warn};

const HOT_LIMIT: &str = "100";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Identity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: ListingPost,
}

#[derive(Debug, Deserialize)]
struct ListingPost {
    id: String,
    title: String,
    score: i64,
    url: String,
    num_comments: i64,
    created_utc: f64,
}

pub struct RedditCollector {
    client: ClientWithMiddleware,
    api_url: String,
    user_agent: String,
    access_token: String,
}

impl RedditCollector {
    /// Resolves credentials, obtains an access token and logs the
    /// authenticated account.
    pub async fn connect(config: &RedditConfig, http: &HttpConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let client = HttpClientFactory::create_client(http);
        let user_agent = user_agent_for(&credentials.username);

        let access_token =
            Self::fetch_access_token(&client, &config.auth_url, &user_agent, &credentials)
                .await
                .context("Could not connect to Reddit. Check your credentials")?;

        let collector = Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user_agent,
            access_token,
        };

        let me: Identity = collector.get_json("/api/v1/me").await?;
        info!("--> Authenticated with Reddit as /u/{}", me.name);

        Ok(collector)
    }

    async fn fetch_access_token(
        client: &ClientWithMiddleware,
        auth_url: &str,
        user_agent: &str,
        credentials: &RedditCredentials,
    ) -> Result<String> {
        let url = format!("{}/api/v1/access_token", auth_url.trim_end_matches('/'));
        let body = encode_form_body(&[
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);

        let response = client
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header("User-Agent", user_agent)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .context("Failed to reach the Reddit token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ExternalService {
                service: "Reddit",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Reddit token response")?;

        // Reddit answers bad credentials with 200 and an error field
        match (token.access_token, token.error) {
            (Some(access_token), None) => Ok(access_token),
            (_, Some(error)) => anyhow::bail!("Reddit rejected the credentials: {}", error),
            (None, None) => anyhow::bail!("Reddit token response carried no access token"),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("bearer {}", self.access_token))
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .with_context(|| format!("Failed to reach Reddit at {}", path))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ExternalService {
                service: "Reddit",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse Reddit response from {}", path))
    }
}

#[async_trait]
impl RedditSource for RedditCollector {
    async fn hot_posts(&self, subreddit: &str) -> Result<Vec<RedditPost>> {
        info!("--> Scraping top {} posts from subreddit: r/{}", HOT_LIMIT, subreddit);

        let path = build_url_with_query(
            &format!("/r/{}/hot", subreddit),
            &[("limit", HOT_LIMIT), ("raw_json", "1")],
        );
        let listing: Listing = self.get_json(&path).await?;

        Ok(into_posts(listing))
    }
}

fn into_posts(listing: Listing) -> Vec<RedditPost> {
    listing
        .data
        .children
        .into_iter()
        .filter_map(|child| {
            let post = child.data;
            let Some(created_utc) = DateTime::from_timestamp(post.created_utc as i64, 0) else {
                warn!("Skipping Reddit post {} with invalid timestamp", post.id);
                return None;
            };
            Some(RedditPost {
                id: post.id,
                title: post.title,
                score: post.score,
                url: post.url,
                num_comments: post.num_comments,
                created_utc,
            })
        })
        .collect()
}

fn user_agent_for(username: &str) -> String {
    format!(
        "script:cryptopulse:v{} (by /u/{})",
        env!("CARGO_PKG_VERSION"),
        username
    )
}

/// File name used for a subreddit's scrape output
pub fn output_file_name(subreddit: &str) -> String {
    format!("{}_reddit.csv", subreddit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_listing_is_flattened() {
        let raw = r#"{
            "kind": "Listing",
            "data": {
                "after": "t3_abc",
                "children": [
                    {"kind": "t3", "data": {
                        "id": "1cq2x9z",
                        "title": "Daily discussion",
                        "score": 412,
                        "url": "https://www.reddit.com/r/Bitcoin/comments/1cq2x9z/",
                        "num_comments": 96,
                        "created_utc": 1715590800.0,
                        "stickied": true
                    }}
                ]
            }
        }"#;

        let listing: Listing = serde_json::from_str(raw).unwrap();
        let posts = into_posts(listing);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "1cq2x9z");
        assert_eq!(posts[0].score, 412);
        assert_eq!(posts[0].num_comments, 96);
        assert_eq!(
            posts[0].created_utc,
            Utc.with_ymd_and_hms(2024, 5, 13, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_token_error_field_is_detected() {
        let token: TokenResponse = serde_json::from_str(r#"{"error": "invalid_grant"}"#).unwrap();
        assert!(token.access_token.is_none());
        assert_eq!(token.error.as_deref(), Some("invalid_grant"));
    }

    #[test]
    fn test_user_agent_names_account() {
        assert!(user_agent_for("pulse_bot").ends_with("(by /u/pulse_bot)"));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("Bitcoin"), "Bitcoin_reddit.csv");
    }
}
