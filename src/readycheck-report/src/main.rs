//! readycheck-report - aggregation tool for readycheck run records.
//!
//! Reads the run record files that checkers delivered to the collection
//! point and produces a fleet-wide summary.
//!
//! ## Usage
//!
//! ```bash
//! # Text summary of a results directory
//! readycheck-report --dir /srv/readycheck/results
//!
//! # Machine-readable output
//! readycheck-report --dir /srv/readycheck/results --format json
//! readycheck-report --dir /srv/readycheck/results --format csv --output fleet.csv
//! ```

mod summary;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use summary::FleetSummary;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Aggregation tool for readycheck run records.
///
/// A read-only consumer of the record format: it never writes into the
/// results directory it scans.
#[derive(Parser)]
#[command(name = "readycheck-report")]
#[command(version = VERSION)]
#[command(about = "Aggregate readycheck run records into a fleet summary")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Directory of delivered run records
    #[arg(short, long)]
    dir: PathBuf,

    /// Output format (text, json, csv)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let summary = FleetSummary::scan(&cli.dir)?;

    let rendered = match cli.format.to_ascii_lowercase().as_str() {
        "json" => serde_json::to_string_pretty(&summary).context("encoding summary")?,
        "csv" => summary.to_csv()?,
        _ => summary.to_text(),
    };

    match &cli.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}
