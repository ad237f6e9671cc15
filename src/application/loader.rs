use crate::domain::repositories::{InsertSummary, PostRepository};
use crate::domain::types::Platform;
use crate::infrastructure::csv_store;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Moves scraped CSV files into the post tables
pub struct LoaderService {
    repository: Arc<dyn PostRepository>,
}

impl LoaderService {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    pub async fn load(&self, platform: Platform, path: &Path) -> Result<InsertSummary> {
        info!("Loading {} data from {:?}", platform, path);

        let summary = match platform {
            Platform::Twitter => {
                let tweets = csv_store::read_tweets(path)?;
                self.repository
                    .save_tweets(&tweets)
                    .await
                    .context("Failed to load tweets")?
            }
            Platform::Reddit => {
                let posts = csv_store::read_reddit_posts(path)?;
                self.repository
                    .save_reddit_posts(&posts)
                    .await
                    .context("Failed to load reddit posts")?
            }
        };

        info!(
            "{} records processed, {} newly inserted into the {} table",
            summary.processed, summary.inserted, platform
        );
        Ok(summary)
    }
}
