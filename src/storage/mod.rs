//! Route persistence.
//!
//! # Data Flow
//! ```text
//! startup:   init() → load() → RouteTable
//! mutation:  registry builds next table → save(&next) → publish
//! ```
//!
//! The persisted form is a JSON object of `"METHOD:pattern"` →
//! `{ "responses": [...] }`, rewritten wholesale on every save.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::routing::RouteTable;

/// All errors a [`RouteStore`] can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed route file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize routes: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Durable home of the route table.
///
/// Implementations must be `Send + Sync + 'static` so they can live in
/// axum application state.
#[async_trait]
pub trait RouteStore: Send + Sync + 'static {
    /// Prepare the backing medium (create directories, empty file).
    async fn init(&self) -> Result<(), StorageError>;

    /// Replace the persisted table with `table`.
    async fn save(&self, table: &RouteTable) -> Result<(), StorageError>;

    /// Read the persisted table; an absent store yields an empty table.
    async fn load(&self) -> Result<RouteTable, StorageError>;
}
