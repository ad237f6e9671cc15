//! Repository Pattern Abstractions
//!
//! Storage for collected social posts. Both tables are keyed by the
//! platform's own id and written with insert-or-ignore semantics, so
//! re-loading a file never duplicates rows.
//!
//! # Example
//!
//! ```rust,no_run
//! use cryptopulse::domain::repositories::PostRepository;
//! use cryptopulse::infrastructure::persistence::database::Database;
//! use cryptopulse::infrastructure::persistence::repositories::SqlitePostRepository;
//!
//! # async {
//! let db = Database::new("sqlite://cryptopulse.db").await?;
//! let repo = SqlitePostRepository::new(db.pool.clone());
//! let posts = repo.fetch_social_posts().await?;
//! # anyhow::Ok(())
//! # };
//! ```

use crate::domain::types::{RedditPost, SocialPost, TwitterPost};
use anyhow::Result;
use async_trait::async_trait;

/// Outcome of a batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    /// Records handed to the repository
    pub processed: usize,
    /// Records that were not already stored
    pub inserted: usize,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn save_tweets(&self, tweets: &[TwitterPost]) -> Result<InsertSummary>;

    async fn save_reddit_posts(&self, posts: &[RedditPost]) -> Result<InsertSummary>;

    /// Every stored post from both platforms, oldest first
    async fn fetch_social_posts(&self) -> Result<Vec<SocialPost>>;

    async fn count_tweets(&self) -> Result<usize>;

    async fn count_reddit_posts(&self) -> Result<usize>;
}
