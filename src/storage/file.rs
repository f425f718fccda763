//! JSON file route store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::config::StorageConfig;
use crate::routing::RouteTable;
use crate::storage::{RouteStore, StorageError};

/// Stores the table as pretty-printed JSON in a single file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        let dir = dir.into();
        let path = dir.join(file_name);
        Self { dir, path }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_dir, &config.file_name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    async fn write_atomic(&self, contents: &str) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .await
            .map_err(|e| self.io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(&self.path, e))
    }
}

#[async_trait]
impl RouteStore for FileStore {
    async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| self.io_error(&self.dir, e))?;

        match fs::metadata(&self.path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.write_atomic("{}").await?;
            }
            Err(e) => return Err(self.io_error(&self.path, e)),
        }

        tracing::info!(path = %self.path.display(), "Storage initialized");
        Ok(())
    }

    async fn save(&self, table: &RouteTable) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(table)?;
        self.write_atomic(&contents).await?;
        tracing::debug!(path = %self.path.display(), routes = table.len(), "Routes saved");
        Ok(())
    }

    async fn load(&self) -> Result<RouteTable, StorageError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No route file, starting empty");
                return Ok(RouteTable::new());
            }
            Err(e) => return Err(self.io_error(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(RouteTable::new());
        }

        let table: RouteTable =
            serde_json::from_str(&contents).map_err(|source| StorageError::Malformed {
                path: self.path.display().to_string(),
                source,
            })?;

        let keys: Vec<String> = table.entries().map(|e| e.key.to_string()).collect();
        tracing::info!(path = %self.path.display(), routes = ?keys, "Loaded routes");
        Ok(table)
    }
}
