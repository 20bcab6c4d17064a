use crate::catalog::seed;
use crate::error::{AppError, Result};
use crate::models::{CatalogItem, TagCounts, ALL_TAG};
use std::collections::HashSet;
use std::path::Path;
use tokio::sync::{Mutex, MutexGuard};

/// One catalog item. Everything except the counters is immutable.
pub(crate) struct CatalogSlot {
    pub(crate) name: String,
    pub(crate) name_lower: String,
    pub(crate) link: String,
    pub(crate) labels: Vec<String>,
    tags: Mutex<TagCounts>,
}

impl CatalogSlot {
    async fn snapshot(&self) -> CatalogItem {
        CatalogItem::new(self.name.clone(), self.link.clone(), self.tags.lock().await.clone())
    }
}

/// Fixed set of searchable items with per-item counter locks
pub struct CatalogStore {
    slots: Vec<CatalogSlot>,
}

impl CatalogStore {
    /// Build a catalog, validating names and tag labels
    pub fn new(items: Vec<CatalogItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(items.len());

        for item in items {
            let name = item.name.trim();
            if name.is_empty() {
                return Err(AppError::Configuration(
                    "Catalog item names must not be empty".to_string(),
                ));
            }

            let name_lower = name.to_lowercase();
            if !seen.insert(name_lower.clone()) {
                return Err(AppError::Configuration(format!(
                    "Duplicate catalog item name: {}",
                    name
                )));
            }

            if !item.tags.contains_key(ALL_TAG) {
                return Err(AppError::Configuration(format!(
                    "Catalog item '{}' is missing the '{}' tag",
                    name, ALL_TAG
                )));
            }

            if let Some(label) = item.labels().find(|label| label.to_lowercase() != *label) {
                return Err(AppError::Configuration(format!(
                    "Catalog item '{}' has non lower-case tag '{}'",
                    name, label
                )));
            }

            slots.push(CatalogSlot {
                name: name.to_string(),
                name_lower,
                link: item.link,
                labels: item.tags.keys().cloned().collect(),
                tags: Mutex::new(item.tags),
            });
        }

        tracing::debug!(items = slots.len(), "Catalog constructed");
        Ok(Self { slots })
    }

    /// Catalog with the built-in seed
    pub fn with_default_seed() -> Result<Self> {
        Self::new(seed::default_items())
    }

    /// Catalog loaded from a TOML seed file
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(seed::load_seed_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn slots(&self) -> &[CatalogSlot] {
        &self.slots
    }

    /// Snapshot every item in catalog order
    pub async fn list_items(&self) -> Vec<CatalogItem> {
        let mut items = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            items.push(slot.snapshot().await);
        }
        items
    }

    /// Case-insensitive exact name lookup
    pub async fn find_by_name(&self, name: &str) -> Option<CatalogItem> {
        match self.slot(name) {
            Some(slot) => Some(slot.snapshot().await),
            None => None,
        }
    }

    /// Take the counter lock of the named item.
    ///
    /// The guard serializes every mutation of that item until dropped.
    pub async fn lock_item(&self, name: &str) -> Result<ItemGuard<'_>> {
        let slot = self
            .slot(name)
            .ok_or_else(|| AppError::NotFound(format!("Item not found: {}", name)))?;

        Ok(ItemGuard {
            name: &slot.name,
            tags: slot.tags.lock().await,
        })
    }

    /// Increment every tag of the named item and return the new counters
    pub async fn increment_tags(&self, name: &str) -> Result<TagCounts> {
        let mut guard = self.lock_item(name).await?;
        Ok(guard.increment())
    }

    pub(crate) async fn snapshot_slot(&self, slot: &CatalogSlot) -> CatalogItem {
        slot.snapshot().await
    }

    fn slot(&self, name: &str) -> Option<&CatalogSlot> {
        let wanted = name.to_lowercase();
        self.slots.iter().find(|slot| slot.name_lower == wanted)
    }
}

/// Exclusive access to one item's counters
pub struct ItemGuard<'a> {
    name: &'a str,
    tags: MutexGuard<'a, TagCounts>,
}

impl ItemGuard<'_> {
    /// Canonical catalog name of the locked item
    pub fn name(&self) -> &str {
        self.name
    }

    /// Current counters
    pub fn tags(&self) -> &TagCounts {
        &self.tags
    }

    /// Add 1 to every counter and return the resulting snapshot
    pub fn increment(&mut self) -> TagCounts {
        for count in self.tags.values_mut() {
            *count = count.saturating_add(1);
        }
        self.tags.clone()
    }

    /// Undo one `increment` made under this guard
    pub fn revert_increment(&mut self) {
        for count in self.tags.values_mut() {
            *count = count.saturating_sub(1);
        }
    }
}
