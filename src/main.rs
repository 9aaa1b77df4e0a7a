//! CLI entry point for the ride-history statistics tool.
//!
//! Loads a ride-history CSV export and prints a summary report to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ride_stats::loader::load_rides_detected;
use ride_stats::output::{print_json, print_report};
use ride_stats::stats::RideStats;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ride_stats")]
#[command(about = "Summarize a personal ride-history export", long_about = None)]
struct Cli {
    /// CSV file containing the ride history
    #[arg(value_name = "FILE")]
    file: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so the report on stdout stays clean
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    tracing_subscriber::registry().with(stderr_layer).init();

    let cli = Cli::parse();

    let Some(path) = cli.file.filter(|f| !f.is_empty()).map(PathBuf::from) else {
        println!("Please provide a CSV file.");
        std::process::exit(1);
    };

    let (rides, mapping) = load_rides_detected(&path)
        .with_context(|| format!("Error loading file '{}'", path.display()))?;
    info!(rides = rides.len(), unit = %mapping.distance_unit, "Generating report");

    let summary = RideStats::new(&rides).summary();
    print_json(&summary)?;
    print_report(Some(&summary), &mapping.distance_unit);

    Ok(())
}
