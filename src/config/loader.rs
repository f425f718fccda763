//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::{Environment, MockServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Selects the environment (`development` / `production`).
pub const ENV_ENVIRONMENT: &str = "MOCK_SERVER_ENV";
/// Overrides the listener port.
pub const ENV_PORT: &str = "PORT";
/// Overrides the storage directory.
pub const ENV_DATA_DIR: &str = "MOCK_SERVER_DATA_DIR";
/// Overrides the log level.
pub const ENV_LOG_LEVEL: &str = "MOCK_SERVER_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {message}")]
    Env { name: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MockServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: MockServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the effective configuration: file (or environment defaults),
/// then environment variables, then validation.
pub fn resolve_config<F>(path: Option<&Path>, lookup: F) -> Result<MockServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let environment = match lookup(ENV_ENVIRONMENT) {
        Some(raw) => Some(Environment::parse(&raw).ok_or_else(|| ConfigError::Env {
            name: ENV_ENVIRONMENT,
            message: format!("unknown environment '{raw}'"),
        })?),
        None => None,
    };

    let mut config = match path {
        Some(path) => {
            let mut config: MockServerConfig = toml::from_str(&fs::read_to_string(path)?)?;
            if let Some(environment) = environment {
                config.environment = environment;
            }
            config
        }
        None => MockServerConfig::for_environment(environment.unwrap_or_default()),
    };

    apply_env_overrides(&mut config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `PORT`, data dir and log level overrides.
pub fn apply_env_overrides<F>(config: &mut MockServerConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_PORT) {
        let port: u16 = raw.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_PORT,
            message: format!("'{raw}' is not a port number"),
        })?;
        config.listener.bind_address = with_port(&config.listener.bind_address, port);
    }

    if let Some(dir) = lookup(ENV_DATA_DIR) {
        config.storage.data_dir = dir.into();
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    Ok(())
}

/// Replace the port of a bind address, keeping its host.
pub fn with_port(bind_address: &str, port: u16) -> String {
    match bind_address.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            addr.to_string()
        }
        Err(_) => format!("0.0.0.0:{port}"),
    }
}
