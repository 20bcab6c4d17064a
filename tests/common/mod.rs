//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_search::{
    api::{auth::TrustedHeaderAuthenticator, build_router, AppState},
    catalog::CatalogStore,
    config::{Config, HistoryWritePolicy},
    error::{AppError, Result},
    models::{HistoryEntry, NewHistoryEntry},
    processing::CatalogProcessor,
    state::{HistoryStore, InMemoryStore},
};
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// History store double whose writes (and optionally reads) always fail
#[derive(Default)]
pub struct FailingStore {
    fail_reads: bool,
    append_attempts: AtomicUsize,
}

impl FailingStore {
    /// Appends fail, reads return no history
    pub fn writes() -> Self {
        Self::default()
    }

    /// Every operation fails
    pub fn all() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn append_attempts(&self) -> usize {
        self.append_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryStore for FailingStore {
    async fn append(&self, _entry: NewHistoryEntry) -> Result<HistoryEntry> {
        self.append_attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Persistence("disk full".to_string()))
    }

    async fn list_by_user(&self, _user: &str) -> Result<Vec<HistoryEntry>> {
        if self.fail_reads {
            return Err(AppError::Persistence("history unavailable".to_string()));
        }
        Ok(Vec::new())
    }

    async fn count_entries(&self) -> Result<u64> {
        Ok(0)
    }
}

/// Catalog with the built-in seed
pub fn default_catalog() -> Arc<CatalogStore> {
    Arc::new(CatalogStore::with_default_seed().unwrap())
}

/// Processor over the default catalog and a fresh in-memory log
pub fn memory_processor() -> (Arc<CatalogProcessor>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let processor = CatalogProcessor::new(default_catalog(), store.clone());
    (Arc::new(processor), store)
}

/// Processor over the default catalog and a failing log
pub fn failing_processor(
    store: Arc<FailingStore>,
    policy: HistoryWritePolicy,
) -> Arc<CatalogProcessor> {
    Arc::new(CatalogProcessor::new(default_catalog(), store).with_write_policy(policy))
}

/// Router authenticating callers through the `x-user-id` header
pub fn test_router(processor: Arc<CatalogProcessor>) -> Router {
    let state = AppState::new(processor, Arc::new(TrustedHeaderAuthenticator::new("x-user-id")));
    build_router(state, &Config::default()).unwrap()
}
