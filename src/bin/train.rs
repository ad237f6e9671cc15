//! Train the linear price model on a processed CSV file.
//!
//! # Usage
//! ```sh
//! cargo run --bin train -- processed_BTCUSDT_data.csv
//! ```

use anyhow::Result;
use clap::Parser;
use cryptopulse::application::ml::{build_features, train};
use cryptopulse::config::Config;
use cryptopulse::infrastructure::csv_store;
use cryptopulse::infrastructure::observability::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the next-hour price model")]
struct Args {
    /// Processed CSV produced by `process`
    filepath: PathBuf,
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load()?;

    info!("Loading processed data from {:?}", args.filepath);
    let rows = csv_store::read_hourly_rows(&args.filepath)?;
    let features = build_features(&rows);
    info!(
        "Built {} feature rows from {} hourly rows",
        features.len(),
        rows.len()
    );

    let outcome = train(&features)?;
    outcome.model.save(&config.artifacts.model_path)?;
    info!(
        "Model trained on {} rows and saved to {:?}",
        outcome.train_size, config.artifacts.model_path
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
            error!("Training failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
