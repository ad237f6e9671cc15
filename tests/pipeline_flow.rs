use chrono::{DateTime, Duration, TimeZone, Utc};
use cryptopulse::application::loader::LoaderService;
use cryptopulse::application::ml::{
    LinearPricePredictor, PricePredictor, build_features, train,
};
use cryptopulse::application::processing::{ProcessingService, processed_file_path};
use cryptopulse::domain::repositories::PostRepository;
use cryptopulse::domain::types::{Candle, Platform, RedditPost, TwitterPost};
use cryptopulse::infrastructure::csv_store;
use cryptopulse::infrastructure::mock::MockMarketDataService;
use cryptopulse::infrastructure::{Database, SqlitePostRepository};
use std::sync::Arc;

fn hour(h: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::hours(h)
}

fn candle(h: i64, close: f64, volume: f64) -> Candle {
    Candle {
        open_time: hour(h),
        open: close,
        high: close,
        low: close,
        close,
        volume,
    }
}

fn tweet(id: usize, at: DateTime<Utc>) -> TwitterPost {
    TwitterPost {
        id: format!("tw{}", id),
        author_id: "42".to_string(),
        created_at: at,
        text: "btc to the moon".to_string(),
        likes: 0,
        retweets: 0,
    }
}

#[tokio::test]
async fn test_two_hour_scenario_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();
    let repository = Arc::new(SqlitePostRepository::new(db.pool.clone()));

    let tweets: Vec<TwitterPost> = [5, 20, 45]
        .iter()
        .enumerate()
        .map(|(i, m)| tweet(i, hour(1) + Duration::minutes(*m)))
        .collect();
    let tweets_csv = dir.path().join("bitcoin_twitter.csv");
    csv_store::write_tweets(&tweets_csv, &tweets).unwrap();

    LoaderService::new(repository.clone())
        .load(Platform::Twitter, &tweets_csv)
        .await
        .unwrap();

    let market = Arc::new(MockMarketDataService::new());
    market
        .set_candles("BTCUSDT", vec![candle(0, 100.0, 10.0), candle(1, 105.0, 12.0)])
        .await;

    let service = ProcessingService::new(repository, market.clone(), dir.path().to_path_buf());
    let rows = service.run("BTC/USDT", hour(0)).await.unwrap();

    let counts: Vec<u64> = rows.iter().map(|r| r.post_count).collect();
    assert_eq!(counts, vec![0, 3]);
    assert_eq!(market.requests().await, vec![("BTCUSDT".to_string(), hour(0))]);

    let written = csv_store::read_hourly_rows(&processed_file_path(dir.path(), "BTCUSDT")).unwrap();
    assert_eq!(written, rows);

    let features = build_features(&written);
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].post_count, 3.0);
    assert_eq!(features[0].volume, 12.0);
    assert_eq!(features[0].last_hour_close, 100.0);
    assert_eq!(features[0].target_close, 105.0);
}

#[tokio::test]
async fn test_both_platforms_feed_the_join() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();
    let repository = Arc::new(SqlitePostRepository::new(db.pool.clone()));

    repository
        .save_tweets(&[tweet(1, hour(0) + Duration::minutes(1))])
        .await
        .unwrap();
    repository
        .save_reddit_posts(&[RedditPost {
            id: "r1".to_string(),
            title: "Daily discussion".to_string(),
            score: 12,
            url: "https://reddit.com/r1".to_string(),
            num_comments: 4,
            created_utc: hour(0) + Duration::minutes(59),
        }])
        .await
        .unwrap();

    let market = Arc::new(MockMarketDataService::new());
    market
        .set_candles("BTCUSDT", vec![candle(0, 1.0, 1.0), candle(1, 1.0, 1.0)])
        .await;

    let rows = ProcessingService::new(repository, market, dir.path().to_path_buf())
        .run("BTCUSDT", hour(0))
        .await
        .unwrap();

    assert_eq!(rows.iter().map(|r| r.post_count).collect::<Vec<_>>(), vec![2, 0]);
}

#[tokio::test]
async fn test_processed_data_trains_a_servable_model() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();
    let repository = Arc::new(SqlitePostRepository::new(db.pool.clone()));

    // close_t = close_{t-1} + 2 * posts_t + 0.01 * volume_t
    let mut candles = Vec::new();
    let mut tweets = Vec::new();
    let mut close = 60000.0;
    for h in 0..40i64 {
        let posts = (h * 3 % 7) as usize;
        let volume = 1000.0 + ((h * h) % 17) as f64 * 10.0;
        if h > 0 {
            close += 2.0 * posts as f64 + 0.01 * volume;
        }
        candles.push(candle(h, close, volume));
        for p in 0..posts {
            tweets.push(tweet(tweets.len(), hour(h) + Duration::minutes(p as i64 * 5)));
        }
    }
    repository.save_tweets(&tweets).await.unwrap();

    let market = Arc::new(MockMarketDataService::new());
    market.set_candles("BTCUSDT", candles).await;

    let rows = ProcessingService::new(repository, market, dir.path().to_path_buf())
        .run("BTCUSDT", hour(0))
        .await
        .unwrap();
    let features = build_features(&rows);
    assert_eq!(features.len(), 39);

    let outcome = train(&features).unwrap();
    assert_eq!(outcome.test_size, 8);
    assert_eq!(outcome.train_size, 31);
    assert!(outcome.mae < 1e-4, "mae = {}", outcome.mae);

    let model_path = dir.path().join("price_prediction_model.json");
    outcome.model.save(&model_path).unwrap();

    let predictor = LinearPricePredictor::load(&model_path).unwrap();
    let input = features[10].input();
    let served = predictor.predict(&input).unwrap();
    let direct = outcome.model.predict(&input).unwrap();
    assert_eq!(served.to_bits(), direct.to_bits());
    assert!((served - features[10].target_close).abs() < 1e-4);
}
