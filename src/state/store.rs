use crate::error::Result;
use crate::models::{HistoryEntry, NewHistoryEntry};
use crate::state::{validate_entry, HistoryStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory history store (for development and testing)
#[derive(Clone)]
pub struct InMemoryStore {
    entries: Arc<DashMap<String, Vec<HistoryEntry>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        validate_entry(&entry)?;

        // Ids are taken under the user's shard lock so per-user order follows id order
        let mut user_entries = self.entries.entry(entry.user.clone()).or_default();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = HistoryEntry::from_new(entry, id);
        user_entries.push(stored.clone());
        drop(user_entries);

        tracing::debug!(entry_id = id, user = %stored.user, "History entry stored");
        Ok(stored)
    }

    async fn list_by_user(&self, user: &str) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .entries
            .get(user)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    async fn count_entries(&self) -> Result<u64> {
        Ok(self
            .entries
            .iter()
            .map(|entries| entries.value().len() as u64)
            .sum())
    }
}
