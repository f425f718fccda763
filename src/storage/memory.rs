//! In-memory route store, for tests and ephemeral servers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::routing::RouteTable;
use crate::storage::{RouteStore, StorageError};

/// Keeps the last saved table as JSON text.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<String>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The last successfully saved document, if any.
    pub fn saved_json(&self) -> Option<serde_json::Value> {
        let saved = self.saved.lock().unwrap_or_else(|p| p.into_inner());
        saved.as_deref().and_then(|s| serde_json::from_str(s).ok())
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save(&self, table: &RouteTable) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("save rejected".into()));
        }
        let text = serde_json::to_string(table)?;
        *self.saved.lock().unwrap_or_else(|p| p.into_inner()) = Some(text);
        Ok(())
    }

    async fn load(&self) -> Result<RouteTable, StorageError> {
        let saved = self.saved.lock().unwrap_or_else(|p| p.into_inner()).clone();
        match saved {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(RouteTable::new()),
        }
    }
}
