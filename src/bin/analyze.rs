//! Correlation analysis and charts of a processed CSV file.
//!
//! Writes the matrix and both PNG charts next to the input file.
//!
//! # Usage
//! ```sh
//! cargo run --bin analyze -- processed_BTCUSDT_data.csv
//! ```

use anyhow::Result;
use clap::Parser;
use cryptopulse::application::analytics;
use cryptopulse::infrastructure::{charts, csv_store};
use cryptopulse::infrastructure::observability::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Correlate social activity with price movement")]
struct Args {
    /// Processed CSV produced by `process`
    filepath: PathBuf,
}

async fn run(args: Args) -> Result<()> {
    let rows = csv_store::read_hourly_rows(&args.filepath)?;
    info!("Analyzing {} hourly rows from {:?}", rows.len(), args.filepath);
    if rows.len() < 3 {
        warn!("Fewer than 3 rows; most correlations will be NaN");
    }

    let report = analytics::analyze(&rows);
    report.log_matrix();

    let output = analytics::correlation_output_path(&args.filepath);
    analytics::write_correlation_csv(&output, &report)?;

    charts::write_time_series_png(
        &args.filepath.with_file_name(charts::TIME_SERIES_FILE),
        &report.time_series,
    )?;
    charts::write_scatter_png(
        &args.filepath.with_file_name(charts::SCATTER_FILE),
        &report.scatter,
    )?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
