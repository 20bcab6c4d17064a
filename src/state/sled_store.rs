use crate::error::{AppError, Result};
use crate::models::{HistoryEntry, NewHistoryEntry};
use crate::state::{validate_entry, HistoryStore};
use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

/// Persistent history store using Sled embedded database
///
/// Keys are `len(user) as u32 BE | user | id as u64 BE`, so a prefix scan on
/// the user yields that user's entries in id order.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
    history_tree: sled::Tree,
}

impl SledStore {
    /// Create a new Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref();
        let db = sled::open(&path).map_err(|e| {
            AppError::Persistence(format!("Failed to open Sled database: {}", e))
        })?;

        let history_tree = db.open_tree("history").map_err(|e| {
            AppError::Persistence(format!("Failed to open history tree: {}", e))
        })?;

        tracing::info!("Initialized Sled history store at {:?}", path_str);

        Ok(Self {
            db: Arc::new(db),
            history_tree,
        })
    }

    fn serialize_entry(entry: &HistoryEntry) -> Result<Vec<u8>> {
        bincode::serialize(entry).map_err(|e| {
            AppError::Serialization(format!("Failed to serialize history entry: {}", e))
        })
    }

    fn deserialize_entry(bytes: &[u8]) -> Result<HistoryEntry> {
        bincode::deserialize(bytes).map_err(|e| {
            AppError::Serialization(format!("Failed to deserialize history entry: {}", e))
        })
    }

    fn user_prefix(user: &str) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(4 + user.len());
        prefix.extend_from_slice(&(user.len() as u32).to_be_bytes());
        prefix.extend_from_slice(user.as_bytes());
        prefix
    }

    fn entry_key(user: &str, id: u64) -> Vec<u8> {
        let mut key = Self::user_prefix(user);
        key.extend_from_slice(&id.to_be_bytes());
        key
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(|e| {
            AppError::Persistence(format!("Failed to flush database: {}", e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SledStore {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        validate_entry(&entry)?;

        let id = self.db.generate_id().map_err(|e| {
            AppError::Persistence(format!("Failed to allocate history id: {}", e))
        })?;
        let stored = HistoryEntry::from_new(entry, id);

        let key = Self::entry_key(&stored.user, id);
        let value = Self::serialize_entry(&stored)?;

        self.history_tree.insert(key, value).map_err(|e| {
            AppError::Persistence(format!("Failed to save history entry: {}", e))
        })?;

        // Flush to ensure durability
        self.history_tree.flush().map_err(|e| {
            AppError::Persistence(format!("Failed to flush history tree: {}", e))
        })?;

        tracing::debug!(entry_id = id, user = %stored.user, "History entry saved to Sled");
        Ok(stored)
    }

    async fn list_by_user(&self, user: &str) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();

        for item in self.history_tree.scan_prefix(Self::user_prefix(user)) {
            let (_, value) = item.map_err(|e| {
                AppError::Persistence(format!("Failed to read history: {}", e))
            })?;
            entries.push(Self::deserialize_entry(&value)?);
        }

        Ok(entries)
    }

    async fn count_entries(&self) -> Result<u64> {
        Ok(self.history_tree.len() as u64)
    }
}
