//! Flat-file storage with fixed column schemas.
//!
//! | file                         | columns                                                   |
//! |------------------------------|-----------------------------------------------------------|
//! | `<query>_twitter.csv`        | id, author_id, created_at, text, likes, retweets          |
//! | `<subreddit>_reddit.csv`     | id, title, score, url, num_comments, created_utc (epoch s)|
//! | `processed_<SYMBOL>_data.csv`| open_time, open, high, low, close, volume, post_count     |

use crate::domain::errors::PipelineError;
use crate::domain::types::{HourlyRow, RedditPost, TwitterPost};
use anyhow::{Context, Result};
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct RedditRecord {
    id: String,
    title: String,
    score: i64,
    url: String,
    num_comments: i64,
    created_utc: f64,
}

impl From<&RedditPost> for RedditRecord {
    fn from(post: &RedditPost) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            score: post.score,
            url: post.url.clone(),
            num_comments: post.num_comments,
            created_utc: post.created_utc.timestamp() as f64,
        }
    }
}

impl TryFrom<RedditRecord> for RedditPost {
    type Error = anyhow::Error;

    fn try_from(record: RedditRecord) -> Result<Self> {
        let created_utc = DateTime::from_timestamp(record.created_utc as i64, 0).with_context(
            || format!("Invalid created_utc {} for post {}", record.created_utc, record.id),
        )?;
        Ok(Self {
            id: record.id,
            title: record.title,
            score: record.score,
            url: record.url,
            num_comments: record.num_comments,
            created_utc,
        })
    }
}

pub fn write_tweets(path: &Path, tweets: &[TwitterPost]) -> Result<()> {
    write_records(path, tweets)
}

pub fn read_tweets(path: &Path) -> Result<Vec<TwitterPost>> {
    read_records(path)
}

pub fn write_reddit_posts(path: &Path, posts: &[RedditPost]) -> Result<()> {
    let records: Vec<RedditRecord> = posts.iter().map(RedditRecord::from).collect();
    write_records(path, &records)
}

pub fn read_reddit_posts(path: &Path) -> Result<Vec<RedditPost>> {
    read_records::<RedditRecord>(path)?
        .into_iter()
        .map(RedditPost::try_from)
        .collect()
}

pub fn write_hourly_rows(path: &Path, rows: &[HourlyRow]) -> Result<()> {
    write_records(path, rows)
}

pub fn read_hourly_rows(path: &Path) -> Result<Vec<HourlyRow>> {
    read_records(path)
}

/// Writes `records` with a header row, creating parent directories.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record to {:?}", path))?;
    }
    writer.flush()?;

    debug!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

/// Reads every record of a CSV file with a header row.
///
/// A missing file is reported as [`PipelineError::MissingInput`].
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(PipelineError::MissingInput {
            path: path.to_path_buf(),
        }
        .into());
    }

    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        // +2: header line plus 1-based numbering
        let record: T = result.with_context(|| format!("Malformed row {} in {:?}", i + 2, path))?;
        records.push(record);
    }
    Ok(records)
}
