pub mod store;
pub mod sled_store;
pub mod factory;

pub use store::InMemoryStore;
pub use sled_store::SledStore;
pub use factory::{create_store, create_in_memory_store};

use crate::error::{AppError, Result};
use crate::models::{HistoryEntry, NewHistoryEntry};
use async_trait::async_trait;

/// Append-only storage for user history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Assign an id, persist, and return the stored entry
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry>;

    /// All entries for a user in insertion order
    async fn list_by_user(&self, user: &str) -> Result<Vec<HistoryEntry>>;

    /// Total number of stored entries
    async fn count_entries(&self) -> Result<u64>;
}

/// Reject entries the log cannot store
pub fn validate_entry(entry: &NewHistoryEntry) -> Result<()> {
    if entry.user.trim().is_empty() {
        return Err(AppError::Persistence(
            "history entry rejected: user must not be empty".to_string(),
        ));
    }
    Ok(())
}
