//! Hardware compatibility checker binary

use clap::Parser;
use gate_check::{render_report, CompatibilityReport, PrecisionTier};
use gate_core::{FactsProvider, Result, StaticFactsProvider, SystemFactsProvider};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "gate-check")]
#[command(about = "Hardware compatibility checker for local model deployment")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Check requirements for a specific precision tier
    #[arg(long, value_name = "TIER", default_value = "fp8")]
    precision: PrecisionTier,

    /// Only print the compatibility summary
    #[arg(short, long)]
    quiet: bool,

    /// Export the full report to a JSON file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Read hardware facts from a JSON file instead of probing the system
    #[arg(long, value_name = "FILE")]
    facts: Option<PathBuf>,

    /// Log level
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .init();

    if let Err(e) = run(&cli) {
        error!("gate-check failed: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let facts = match &cli.facts {
        Some(path) => StaticFactsProvider::from_json_file(path)?.collect()?,
        None => SystemFactsProvider::new().collect()?,
    };

    let report = CompatibilityReport::evaluate(facts);

    if cli.quiet {
        println!(
            "{} compatibility: {}",
            cli.precision,
            if report.compatible(cli.precision) {
                "COMPATIBLE"
            } else {
                "NOT COMPATIBLE"
            }
        );
    } else {
        print!("{}", render_report(&report));
    }

    if let Some(path) = &cli.export {
        report.export(path)?;
    }

    Ok(())
}
