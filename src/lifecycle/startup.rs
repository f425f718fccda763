//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize storage and load the persisted route table
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when routes are loaded)

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::MockServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::registry::MockRegistry;
use crate::storage::{FileStore, StorageError};

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to initialize storage: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// How the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Signal,
    Fault,
}

/// Load routes, bind, and serve until a signal or a fail-fast fault.
pub async fn run(config: MockServerConfig) -> Result<ExitReason, StartupError> {
    tracing::info!(
        environment = %config.environment,
        data_dir = %config.storage.data_dir.display(),
        "Starting server initialization"
    );

    let store = Arc::new(FileStore::from_config(&config.storage));
    let registry = Arc::new(MockRegistry::open(store).await?);
    tracing::info!(route_count = registry.snapshot().len(), "Server initialization complete");

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(StartupError::Serve)?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, registry, &shutdown);
    tracing::info!(address = %local_addr, pid = std::process::id(), "Server started");
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)?;

    if shutdown.is_faulted() {
        Ok(ExitReason::Fault)
    } else {
        Ok(ExitReason::Signal)
    }
}
