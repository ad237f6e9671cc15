//! Collect social posts into a CSV file.
//!
//! # Usage
//! ```sh
//! cargo run --bin scrape -- twitter "bitcoin lang:en"
//! cargo run --bin scrape -- reddit Bitcoin
//! ```

use anyhow::Result;
use clap::Parser;
use cryptopulse::application::collection;
use cryptopulse::config::Config;
use cryptopulse::domain::types::Platform;
use cryptopulse::infrastructure::observability::init_tracing;
use cryptopulse::infrastructure::{RedditCollector, TwitterCollector};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape recent posts from Twitter or Reddit")]
struct Args {
    /// `twitter` or `reddit`
    platform: String,

    /// Search query (Twitter) or subreddit name (Reddit)
    query: String,
}

async fn run(args: Args) -> Result<()> {
    let platform = Platform::from_str(&args.platform)?;
    let config = Config::load()?;
    let output_dir = &config.artifacts.output_dir;

    let written = match platform {
        Platform::Twitter => {
            let collector = TwitterCollector::new(&config.twitter, &config.http)?;
            collection::scrape_twitter(&collector, &args.query, output_dir).await?
        }
        Platform::Reddit => {
            let collector = RedditCollector::connect(&config.reddit, &config.http).await?;
            collection::scrape_reddit(&collector, &args.query, output_dir).await?
        }
    };

    if written.is_none() {
        info!("Nothing collected; no file written");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Scrape failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
