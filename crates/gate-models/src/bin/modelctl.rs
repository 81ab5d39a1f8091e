//! Model management CLI

use clap::{Parser, Subcommand};
use gate_core::SystemFactsProvider;
use gate_models::{ModelManager, ModelStore, Result};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "modelctl")]
#[command(about = "Model weight catalog and install-state management")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Models directory
    #[arg(long, value_name = "DIR", default_value = "models")]
    models_dir: PathBuf,

    /// Log level
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog and install status
    List,
    /// Check system requirements for a model
    Check {
        /// Catalog key to check
        model: String,
    },
    /// Record a model install after verifying requirements
    Install {
        /// Catalog key to install
        model: String,
    },
    /// Set the active model
    SetActive {
        /// Catalog key to activate
        model: String,
    },
    /// Remove an installed model
    Remove {
        /// Catalog key to remove
        model: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .init();

    if let Err(e) = run(cli) {
        error!("modelctl failed: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = ModelStore::open(&cli.models_dir)?;
    let provider = SystemFactsProvider::new();
    let mut manager = ModelManager::new(store, &provider)?;

    match cli.command {
        Commands::List => {
            for (build, installed, active) in manager.list() {
                let status = if installed { "installed" } else { "available" };
                let marker = if active { " [active]" } else { "" };
                println!(
                    "{}: {} ({:.0}GiB) - {}{}",
                    build.key, build.name, build.size_gb, status, marker
                );
                println!("  {}", build.description);
                println!(
                    "  requires {:.0}GiB RAM, {:.0}GiB VRAM",
                    build.min_ram_gb, build.min_vram_gb
                );
            }
            Ok(())
        }
        Commands::Check { model } => {
            let check = manager.check(&model)?;
            for result in &check.checks {
                let status = if result.passed { "PASS" } else { "FAIL" };
                println!(
                    "[{}] {}: {} (required: {})",
                    status, result.name, result.actual, result.required
                );
            }
            println!(
                "Storage: {:.1}GiB free, {:.1}GiB needed ({})",
                check.storage_free_gb,
                check.storage_needed_gb,
                if check.disk_ok { "ok" } else { "insufficient" }
            );
            println!(
                "Overall: {}",
                if check.ok() { "COMPATIBLE" } else { "NOT COMPATIBLE" }
            );
            Ok(())
        }
        Commands::Install { model } => {
            manager.install(&model)?;
            println!("Recorded install of {}", model);
            Ok(())
        }
        Commands::SetActive { model } => {
            manager.set_active(&model)?;
            println!("Active model set to {}", model);
            Ok(())
        }
        Commands::Remove { model } => {
            manager.remove(&model)?;
            println!("Removed {}", model);
            Ok(())
        }
    }
}
