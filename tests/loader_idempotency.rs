use chrono::{TimeZone, Utc};
use cryptopulse::application::loader::LoaderService;
use cryptopulse::domain::errors::PipelineError;
use cryptopulse::domain::repositories::PostRepository;
use cryptopulse::domain::types::{Platform, RedditPost, TwitterPost};
use cryptopulse::infrastructure::csv_store;
use cryptopulse::infrastructure::{Database, SqlitePostRepository};
use std::sync::Arc;

#[tokio::test]
async fn test_loading_same_file_twice_stores_each_post_once() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();
    let repository = Arc::new(SqlitePostRepository::new(db.pool.clone()));
    let loader = LoaderService::new(repository.clone());

    let posts: Vec<RedditPost> = (0..3)
        .map(|i| RedditPost {
            id: format!("p{}", i),
            title: format!("Title {}", i),
            score: i,
            url: format!("https://reddit.com/p{}", i),
            num_comments: 0,
            created_utc: Utc.with_ymd_and_hms(2024, 5, 13, 9, i as u32, 0).unwrap(),
        })
        .collect();
    let path = dir.path().join("Bitcoin_reddit.csv");
    csv_store::write_reddit_posts(&path, &posts).unwrap();

    let first = loader.load(Platform::Reddit, &path).await.unwrap();
    let second = loader.load(Platform::Reddit, &path).await.unwrap();

    assert_eq!((first.processed, first.inserted), (3, 3));
    assert_eq!((second.processed, second.inserted), (3, 0));
    assert_eq!(repository.count_reddit_posts().await.unwrap(), 3);
    assert_eq!(repository.count_tweets().await.unwrap(), 0);
}

#[tokio::test]
async fn test_same_tweet_id_from_two_files() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();
    let repository = Arc::new(SqlitePostRepository::new(db.pool.clone()));
    let loader = LoaderService::new(repository.clone());

    let tweet = TwitterPost {
        id: "1790000000000000000".to_string(),
        author_id: "99".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 13, 9, 15, 0).unwrap(),
        text: "gm".to_string(),
        likes: 3,
        retweets: 1,
    };
    let a = dir.path().join("bitcoin_twitter.csv");
    let b = dir.path().join("btc_twitter.csv");
    csv_store::write_tweets(&a, std::slice::from_ref(&tweet)).unwrap();
    csv_store::write_tweets(&b, std::slice::from_ref(&tweet)).unwrap();

    loader.load(Platform::Twitter, &a).await.unwrap();
    loader.load(Platform::Twitter, &b).await.unwrap();

    assert_eq!(repository.count_tweets().await.unwrap(), 1);
    let stored = repository.fetch_social_posts().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].created_at, tweet.created_at);
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();
    let loader = LoaderService::new(Arc::new(SqlitePostRepository::new(db.pool.clone())));

    let err = loader
        .load(Platform::Twitter, &dir.path().join("nope.csv"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::MissingInput { .. })
    ));
}
