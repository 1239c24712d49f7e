//! readycheck CLI - device eligibility checker with resilient delivery.
//!
//! Runs the fixed check suite once per device, writes the verdict record
//! to the configured destination, and queues it locally when the
//! destination is unreachable.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use readycheck_core::{
    CheckerConfig, DirectorySink, ReadinessEngine, ReadinessError, RunOutcome,
};
use readycheck_facts::HostFacts;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Device eligibility checker.
///
/// Evaluates a fixed set of hardware/firmware criteria (storage, memory,
/// TPM, processor, secure boot), combines them into one verdict, and
/// delivers the diagnostic record to a central collection point — queuing
/// it locally whenever the destination is unreachable.
#[derive(Parser)]
#[command(name = "readycheck")]
#[command(version = VERSION)]
#[command(about = "Device eligibility checker with resilient delivery")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Local state directory (marker and delivery queue)
    #[arg(long, default_value = "/var/lib/readycheck")]
    state_dir: PathBuf,

    /// Remote destination base directory
    #[arg(long, default_value = "/srv/readycheck/results")]
    destination: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full flow: flush queue, evaluate once, deliver, mark done
    Run,

    /// Dry run: evaluate and print the record without touching marker,
    /// queue, or destination
    Evaluate,

    /// Print the collected fact set
    Facts,

    /// Flush the local delivery queue only
    Flush,
}

fn main() -> ExitCode {
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

    match execute(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("readycheck: {err}");
            if err.is_retryable() {
                eprintln!("readycheck: no state was recorded; the next invocation retries");
            }
            ExitCode::FAILURE
        },
    }
}

/// Exit codes follow the verdict: 0 capable, 1 not capable, 2 for
/// undetermined or failed-to-run.
fn verdict_exit(verdict_code: i32) -> ExitCode {
    match verdict_code {
        0 => ExitCode::SUCCESS,
        1 => ExitCode::from(1),
        _ => ExitCode::from(2),
    }
}

fn execute(cli: &Cli) -> Result<ExitCode, ReadinessError> {
    let config = CheckerConfig::rooted_at(&cli.state_dir, cli.destination.clone());
    let sink = DirectorySink::new(config.destination_dir.clone());
    let engine = ReadinessEngine::new(config, HostFacts::new(), sink);
    let json = cli.format.eq_ignore_ascii_case("json");

    match cli.command {
        Commands::Run => {
            let summary = engine.run()?;
            if summary.flush.delivered > 0 || summary.flush.remaining > 0 {
                println!(
                    "queue flush: {} delivered, {} remaining",
                    summary.flush.delivered, summary.flush.remaining
                );
            }
            match summary.outcome {
                RunOutcome::AlreadyCompleted => {
                    println!("already completed on this device; nothing to do");
                    Ok(ExitCode::SUCCESS)
                },
                RunOutcome::Bypassed { os_build } => {
                    println!("os build {os_build} already at target; evaluation bypassed");
                    Ok(ExitCode::SUCCESS)
                },
                RunOutcome::Evaluated {
                    delivery, record, ..
                } => {
                    if json {
                        println!("{}", String::from_utf8_lossy(&record.to_json()?));
                    } else {
                        println!("{}", record.summary());
                        println!("delivery: {delivery:?}");
                    }
                    Ok(verdict_exit(record.verdict_code))
                },
                RunOutcome::FailedToRun { message, .. } => {
                    eprintln!("evaluation failed to run: {message}");
                    Ok(ExitCode::from(2))
                },
            }
        },
        Commands::Evaluate => {
            let record = engine.evaluate_only()?;
            if json {
                println!("{}", String::from_utf8_lossy(&record.to_json()?));
            } else {
                println!("{}", record.summary());
                for fragment in record.trail.split("; ").filter(|f| !f.is_empty()) {
                    println!("  {fragment}");
                }
            }
            Ok(verdict_exit(record.verdict_code))
        },
        Commands::Facts => {
            use readycheck_facts::FactSource;
            let facts = HostFacts::new().collect()?;
            let rendered =
                serde_json::to_string_pretty(&facts).map_err(ReadinessError::from)?;
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        },
        Commands::Flush => {
            let summary = engine.flush_only();
            println!(
                "queue flush: {} delivered, {} remaining",
                summary.delivered, summary.remaining
            );
            Ok(ExitCode::SUCCESS)
        },
    }
}
