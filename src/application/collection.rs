use crate::domain::ports::{RedditSource, TweetSource};
use crate::infrastructure::{csv_store, reddit, twitter};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Collects posts from a source and stores them as CSV in `output_dir`.
///
/// Returns the written file, or `None` when nothing was collected.
pub async fn scrape_twitter(
    source: &dyn TweetSource,
    query: &str,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let tweets = source.search_recent(query).await?;
    if tweets.is_empty() {
        info!("No tweets found for '{}'", query);
        return Ok(None);
    }

    let path = output_dir.join(twitter::output_file_name(query));
    csv_store::write_tweets(&path, &tweets)?;
    info!("Saved {} tweets to {:?}", tweets.len(), path);
    Ok(Some(path))
}

pub async fn scrape_reddit(
    source: &dyn RedditSource,
    subreddit: &str,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let posts = source.hot_posts(subreddit).await?;
    if posts.is_empty() {
        info!("No posts found in r/{}", subreddit);
        return Ok(None);
    }

    let path = output_dir.join(reddit::output_file_name(subreddit));
    csv_store::write_reddit_posts(&path, &posts)?;
    info!("Saved {} posts to {:?}", posts.len(), path);
    Ok(Some(path))
}
