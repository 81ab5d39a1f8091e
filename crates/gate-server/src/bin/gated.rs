//! Inference gateway daemon

use clap::Parser;
use gate_server::{GatewayConfig, GatewayServer};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gated")]
#[command(about = "REST inference gateway with local/API fallback")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTTP server port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(short, long, value_name = "ADDRESS")]
    bind: Option<String>,

    /// Disable CORS support
    #[arg(long)]
    disable_cors: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gate_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match GatewayConfig::from_file(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Configuration error: {}", e);
                process::exit(1);
            }
        },
        None => GatewayConfig::default(),
    };

    // Apply CLI overrides
    if let Some(port) = cli.port {
        config.http_port = port;
    }
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if cli.disable_cors {
        config.enable_cors = false;
    }

    info!("Starting gated:");
    info!("  Bind address: {}", config.bind_address);
    info!("  HTTP port: {}", config.http_port);
    info!("  API endpoint: {}", config.api.endpoint);
    info!("  CORS enabled: {}", config.enable_cors);

    let server = match GatewayServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create gateway: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = server.serve().await {
        error!("Gateway error: {}", e);
        process::exit(1);
    }
}
