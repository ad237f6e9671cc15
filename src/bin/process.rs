//! Join stored posts with hourly Binance candles.
//!
//! # Usage
//! ```sh
//! cargo run --bin process -- BTCUSDT 2024-05-01
//! ```

use anyhow::Result;
use clap::Parser;
use cryptopulse::application::processing::{ProcessingService, parse_start_date};
use cryptopulse::config::Config;
use cryptopulse::infrastructure::observability::init_tracing;
use cryptopulse::infrastructure::{BinanceMarketDataService, Database, SqlitePostRepository};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Join social activity with hourly market data")]
struct Args {
    /// Trading pair, e.g. BTCUSDT or BTC/USDT
    symbol: String,

    /// First day to fetch, YYYY-MM-DD (UTC)
    start_date: String,
}

async fn run(args: Args) -> Result<()> {
    let start = parse_start_date(&args.start_date)?;
    let config = Config::load()?;

    let db = Database::new(&config.database.url).await?;
    let repository = Arc::new(SqlitePostRepository::new(db.pool.clone()));
    let market_data = Arc::new(BinanceMarketDataService::new(&config.binance, &config.http));

    let service = ProcessingService::new(
        repository,
        market_data,
        config.artifacts.output_dir.clone(),
    );
    service.run(&args.symbol, start).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Processing failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
