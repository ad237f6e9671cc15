//! Load a scraped CSV file into the database.
//!
//! # Usage
//! ```sh
//! cargo run --bin load -- twitter bitcoin_twitter.csv
//! ```

use anyhow::Result;
use clap::Parser;
use cryptopulse::application::loader::LoaderService;
use cryptopulse::config::Config;
use cryptopulse::domain::types::Platform;
use cryptopulse::infrastructure::observability::init_tracing;
use cryptopulse::infrastructure::{Database, SqlitePostRepository};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Load a scraped CSV file into the database")]
struct Args {
    /// `twitter` or `reddit`
    platform: String,

    /// CSV file produced by `scrape`
    filepath: PathBuf,
}

async fn run(args: Args) -> Result<()> {
    let platform = Platform::from_str(&args.platform)?;
    let config = Config::load()?;

    let db = Database::new(&config.database.url).await?;
    let repository = Arc::new(SqlitePostRepository::new(db.pool.clone()));
    let loader = LoaderService::new(repository);

    let summary = loader.load(platform, &args.filepath).await?;
    info!(
        "Data loading complete: {} inserted, {} already present",
        summary.inserted,
        summary.processed - summary.inserted
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Load failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
