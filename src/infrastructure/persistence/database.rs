use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Database wrapper owning the connection pool and the schema
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)
            .with_context(|| format!("Invalid database URL: {}", db_url))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Error connecting to database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Private in-memory database, used by tests and dry runs.
    ///
    /// Every pooled connection to `sqlite::memory:` opens its own database,
    /// so the pool is pinned to a single connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Twitter posts, keyed by tweet id
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS twitter_posts (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                text TEXT NOT NULL,
                likes INTEGER NOT NULL DEFAULT 0,
                retweets INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create twitter_posts table")?;

        // 2. Reddit posts, keyed by submission id
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reddit_posts (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                score INTEGER NOT NULL DEFAULT 0,
                url TEXT NOT NULL,
                num_comments INTEGER NOT NULL DEFAULT 0,
                created_utc INTEGER NOT NULL
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create reddit_posts table")?;

        // Aggregation reads both tables ordered by time
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_twitter_posts_created_at
            ON twitter_posts (created_at);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create twitter_posts index")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_reddit_posts_created_utc
            ON reddit_posts (created_utc);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create reddit_posts index")?;

        Ok(())
    }
}
