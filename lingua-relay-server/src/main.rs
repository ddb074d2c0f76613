// lingua-relay-server/src/main.rs
// ============================================================================
// Module: Relay Server Entry Point
// Description: Binary entry point for the translation relay server.
// Purpose: Parse arguments, load configuration, and run the server.
// Dependencies: clap, lingua-relay-config, lingua-relay-server, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! Loads configuration (from `--config`, the `LINGUA_RELAY_CONFIG`
//! environment variable, or the default file name), initializes structured
//! logging, and runs the relay server until shutdown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lingua_relay_config::RelayConfig;
use lingua_relay_server::RelayServer;
use lingua_relay_server::ServerError;
use tracing::error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Command-line arguments for the relay server.
#[derive(Debug, Parser)]
#[command(name = "lingua-relay-server", about = "Asynchronous translation relay server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Binary entry point.
#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "relay server exited with an error");
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration and serves until shutdown.
async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = RelayConfig::load(cli.config.as_deref())?;
    let server = RelayServer::from_config(config)?;
    server.serve().await
}

/// Initializes the tracing subscriber with an environment-driven filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
