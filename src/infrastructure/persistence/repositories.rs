use crate::domain::repositories::{InsertSummary, PostRepository};
use crate::domain::types::{Platform, RedditPost, SocialPost, TwitterPost};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{info, warn};

pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn save_tweets(&self, tweets: &[TwitterPost]) -> Result<InsertSummary> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0usize;

        for tweet in tweets {
            // Natural key dedup: re-loading a file is a no-op
            let result = sqlx::query(
                r#"
                INSERT INTO twitter_posts (id, author_id, created_at, text, likes, retweets)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO NOTHING
                "#,
            )
            .bind(&tweet.id)
            .bind(&tweet.author_id)
            .bind(tweet.created_at.timestamp())
            .bind(&tweet.text)
            .bind(tweet.likes)
            .bind(tweet.retweets)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save tweet {}", tweet.id))?;

            inserted += result.rows_affected() as usize;
        }

        tx.commit().await.context("Failed to commit tweets")?;

        info!(
            "Persisted {} new of {} tweets",
            inserted,
            tweets.len()
        );
        Ok(InsertSummary {
            processed: tweets.len(),
            inserted,
        })
    }

    async fn save_reddit_posts(&self, posts: &[RedditPost]) -> Result<InsertSummary> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0usize;

        for post in posts {
            let result = sqlx::query(
                r#"
                INSERT INTO reddit_posts (id, title, score, url, num_comments, created_utc)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO NOTHING
                "#,
            )
            .bind(&post.id)
            .bind(&post.title)
            .bind(post.score)
            .bind(&post.url)
            .bind(post.num_comments)
            .bind(post.created_utc.timestamp())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save reddit post {}", post.id))?;

            inserted += result.rows_affected() as usize;
        }

        tx.commit().await.context("Failed to commit reddit posts")?;

        info!(
            "Persisted {} new of {} reddit posts",
            inserted,
            posts.len()
        );
        Ok(InsertSummary {
            processed: posts.len(),
            inserted,
        })
    }

    async fn fetch_social_posts(&self) -> Result<Vec<SocialPost>> {
        let rows = sqlx::query(
            r#"
            SELECT 'twitter' AS platform, created_at AS ts, text FROM twitter_posts
            UNION ALL
            SELECT 'reddit' AS platform, created_utc AS ts, title AS text FROM reddit_posts
            ORDER BY ts ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch social posts")?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            let platform: String = row.try_get("platform")?;
            let ts: i64 = row.try_get("ts")?;
            let Some(created_at) = DateTime::from_timestamp(ts, 0) else {
                warn!("Skipping stored post with out-of-range timestamp {}", ts);
                continue;
            };

            posts.push(SocialPost {
                platform: Platform::from_str(&platform)?,
                created_at,
                text: row.try_get("text")?,
            });
        }
        Ok(posts)
    }

    async fn count_tweets(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM twitter_posts")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }

    async fn count_reddit_posts(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM reddit_posts")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::database::Database;
    use chrono::{TimeZone, Utc};

    fn tweet(id: &str, hour: u32) -> TwitterPost {
        TwitterPost {
            id: id.to_string(),
            author_id: "7".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, hour, 5, 0).unwrap(),
            text: format!("tweet {}", id),
            likes: 1,
            retweets: 0,
        }
    }

    fn reddit_post(id: &str, hour: u32) -> RedditPost {
        RedditPost {
            id: id.to_string(),
            title: format!("post {}", id),
            score: 10,
            url: format!("https://reddit.com/{}", id),
            num_comments: 2,
            created_utc: Utc.with_ymd_and_hms(2024, 2, 1, hour, 30, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_tweet_is_stored_once() {
        let db = Database::in_memory().await.unwrap();
        let repo = SqlitePostRepository::new(db.pool.clone());

        let first = repo.save_tweets(&[tweet("1", 3)]).await.unwrap();
        let second = repo.save_tweets(&[tweet("1", 3)]).await.unwrap();

        assert_eq!(first.inserted, 1);
        assert_eq!(second.processed, 1);
        assert_eq!(second.inserted, 0);
        assert_eq!(repo.count_tweets().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_within_one_batch() {
        let db = Database::in_memory().await.unwrap();
        let repo = SqlitePostRepository::new(db.pool.clone());

        let summary = repo
            .save_reddit_posts(&[reddit_post("a", 1), reddit_post("a", 1), reddit_post("b", 2)])
            .await
            .unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.inserted, 2);
        assert_eq!(repo.count_reddit_posts().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_merges_platforms_in_time_order() {
        let db = Database::in_memory().await.unwrap();
        let repo = SqlitePostRepository::new(db.pool.clone());

        repo.save_tweets(&[tweet("t2", 5), tweet("t1", 1)])
            .await
            .unwrap();
        repo.save_reddit_posts(&[reddit_post("r1", 3)]).await.unwrap();

        let posts = repo.fetch_social_posts().await.unwrap();
        let platforms: Vec<Platform> = posts.iter().map(|p| p.platform).collect();

        assert_eq!(
            platforms,
            vec![Platform::Twitter, Platform::Reddit, Platform::Twitter]
        );
        assert!(posts.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(posts[1].text, "post r1");
    }
}
