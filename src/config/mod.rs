//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional) or per-environment defaults
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → MockServerConfig (validated, immutable)
//!     → CLI flags applied last in main
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{
    Environment, ListenerConfig, LogFormat, MockServerConfig, ObservabilityConfig,
    SecurityConfig, SelectionConfig, ServerConfig, StorageConfig,
};
pub use validation::{validate_config, ValidationError};
