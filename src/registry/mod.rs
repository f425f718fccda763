//! Mock registry: the owner of the live route table.
//!
//! # Data Flow
//! ```text
//! request handlers:  snapshot() → Arc<RouteTable> (lock-free, never waits on I/O)
//!
//! register / delete / flush:
//!     lock writer
//!     → clone current table
//!     → apply change
//!     → store.save(&next)
//!     → publish next (only if the save succeeded)
//!     → unlock
//! ```
//!
//! # Design Decisions
//! - One writer lock serializes every read-modify-write, so two mutations
//!   in this process can never drop each other's change
//! - A failed save leaves the published table untouched (rollback)
//! - `createdAt` ids are strictly increasing within the process

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::observability::metrics;
use crate::routing::key::RouteKeyError;
use crate::routing::table::{Removal, TableError};
use crate::routing::{CandidateResponse, RouteKey, RouteTable};
use crate::storage::{RouteStore, StorageError};

/// Error type for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(String),

    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("response '{id}' not found on route {key}")]
    ResponseNotFound { key: String, id: String },

    #[error("failed to persist routes: {0}")]
    Persist(#[from] StorageError),
}

impl From<RouteKeyError> for RegistryError {
    fn from(e: RouteKeyError) -> Self {
        RegistryError::Validation(e.to_string())
    }
}

impl From<TableError> for RegistryError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::RouteNotFound(key) => RegistryError::RouteNotFound(key),
            TableError::ResponseNotFound { key, id } => RegistryError::ResponseNotFound { key, id },
            TableError::Pattern(p) => RegistryError::Validation(p.to_string()),
        }
    }
}

/// A new candidate response to register.
#[derive(Debug, Clone)]
pub struct Registration {
    pub method: String,
    pub path: String,
    pub body: Value,
    pub status_code: u16,
    pub description: String,
    pub conditions: Map<String, Value>,
}

/// What a successful registration produced.
#[derive(Debug, Clone)]
pub struct Registered {
    pub key: RouteKey,
    pub created_at: String,
}

struct Writer {
    last_created_at: Option<DateTime<Utc>>,
}

impl Writer {
    /// Millisecond timestamp strictly after the previous one issued.
    fn next_timestamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = now.trunc_subsecs(3);
        let next = match self.last_created_at {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created_at = Some(next);
        next
    }
}

/// Live route table plus its persistence.
pub struct MockRegistry {
    table: ArcSwap<RouteTable>,
    writer: Mutex<Writer>,
    store: Arc<dyn RouteStore>,
}

impl MockRegistry {
    /// Initialize the store and load the persisted table.
    pub async fn open(store: Arc<dyn RouteStore>) -> Result<Self, StorageError> {
        store.init().await?;
        let table = store.load().await?;
        tracing::info!(route_count = table.len(), "Route table loaded");
        Ok(Self::with_table(store, table))
    }

    /// Build a registry around an already-loaded table.
    pub fn with_table(store: Arc<dyn RouteStore>, table: RouteTable) -> Self {
        let last_created_at = table
            .entries()
            .flat_map(|e| e.route.responses.iter())
            .filter_map(|r| DateTime::parse_from_rfc3339(&r.created_at).ok())
            .map(|t| t.with_timezone(&Utc))
            .max();

        metrics::set_route_count(table.len());
        Self {
            table: ArcSwap::from_pointee(table),
            writer: Mutex::new(Writer { last_created_at }),
            store,
        }
    }

    /// The latest committed table.
    pub fn snapshot(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    /// Append a candidate response under `METHOD:path`.
    pub async fn register(&self, registration: Registration) -> Result<Registered, RegistryError> {
        let key = RouteKey::new(&registration.method, registration.path)?;

        let mut writer = self.writer.lock().await;
        let mut next = RouteTable::clone(&self.table.load());
        let created_at = writer
            .next_timestamp(Utc::now())
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        next.insert_response(
            key.clone(),
            CandidateResponse {
                body: registration.body,
                status_code: registration.status_code,
                description: registration.description,
                conditions: registration.conditions,
                created_at: created_at.clone(),
            },
        )?;

        self.commit("register", next).await?;
        tracing::info!(route = %key, created_at = %created_at, "Mock response registered");
        Ok(Registered { key, created_at })
    }

    /// Remove one candidate by id; the route goes away with its last response.
    pub async fn delete_response(
        &self,
        method: &str,
        path: &str,
        response_id: &str,
    ) -> Result<Removal, RegistryError> {
        let key = RouteKey::new(method, path)?;

        let _writer = self.writer.lock().await;
        let mut next = RouteTable::clone(&self.table.load());
        let removal = next.remove_response(&key, response_id)?;

        self.commit("delete", next).await?;
        tracing::info!(route = %key, response_id = %response_id, removal = ?removal, "Mock response deleted");
        Ok(removal)
    }

    /// Drop every route.
    pub async fn flush(&self) -> Result<(), RegistryError> {
        let _writer = self.writer.lock().await;
        self.commit("flush", RouteTable::new()).await?;
        tracing::info!("All mock routes flushed");
        Ok(())
    }

    async fn commit(&self, op: &'static str, next: RouteTable) -> Result<(), RegistryError> {
        if let Err(e) = self.store.save(&next).await {
            tracing::error!(op, error = %e, "Failed to persist routes; in-memory table unchanged");
            metrics::record_mutation(op, false);
            return Err(RegistryError::Persist(e));
        }
        metrics::set_route_count(next.len());
        metrics::record_mutation(op, true);
        self.table.store(Arc::new(next));
        Ok(())
    }
}

impl std::fmt::Debug for MockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRegistry")
            .field("routes", &self.table.load().len())
            .finish()
    }
}
