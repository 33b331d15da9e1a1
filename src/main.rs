//! Sepolia Demo
//!
//! Runs one Ethereum workflow per invocation and exits non-zero on any failure.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sepolia_demo::{cli::Cli, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; stdout is reserved for results
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!(?config, "Configuration loaded");

    match sepolia_demo::cli::execute(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Workflow failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
