//! HTTP mock server.
//!
//! # Architecture Overview
//!
//! ```text
//!   request ──▶ http::server ──▶ routing::matcher ──▶ responses::{selector, render} ──▶ response
//!                    │                 ▲
//!                    │                 │ lock-free snapshot
//!                    ▼                 │
//!               admin API ──────▶ registry (single writer) ──────▶ storage (JSON file)
//!
//!   cross-cutting: config · observability · security · lifecycle
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mock_server::config::{self, loader, Environment};
use mock_server::lifecycle::startup::{self, ExitReason};
use mock_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "mock-server")]
#[command(about = "Configurable HTTP mock server", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener port (overrides config and PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for the persisted route file.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// development or production.
    #[arg(long, value_parser = parse_environment)]
    env: Option<Environment>,
}

fn parse_environment(raw: &str) -> Result<Environment, String> {
    Environment::parse(raw).ok_or_else(|| format!("unknown environment '{raw}'"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match config::resolve_config(cli.config.as_deref(), |name| {
        if name == loader::ENV_ENVIRONMENT {
            if let Some(env) = cli.env {
                return Some(env.to_string());
            }
        }
        std::env::var(name).ok()
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mock-server: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(port) = cli.port {
        config.listener.bind_address = loader::with_port(&config.listener.bind_address, port);
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    if let Err(errors) = config::validate_config(&config) {
        for e in errors {
            eprintln!("mock-server: invalid configuration: {e}");
        }
        return ExitCode::FAILURE;
    }

    logging::init_logging(&config.observability);
    logging::install_panic_hook();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        bind_address = %config.listener.bind_address,
        "mock-server starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match startup::run(config).await {
        Ok(ExitReason::Signal) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Ok(ExitReason::Fault) => {
            tracing::error!("Stopped after an unhandled fault");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed to start");
            ExitCode::FAILURE
        }
    }
}
