use crate::error::Result;
use crate::models::{HistoryEntry, Preferences, TagCounts};
use crate::state::HistoryStore;
use std::sync::Arc;

/// Sum every `(tag, count)` pair across all snapshots of all entries.
///
/// Boost entries contribute their single map, search entries every map they
/// recorded. Addition is commutative, so entry order never changes the result.
pub fn aggregate_entries<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> TagCounts {
    let mut totals = TagCounts::new();
    for entry in entries {
        for tags in entry.tags.maps() {
            for (tag, count) in tags {
                let total = totals.entry(tag.clone()).or_insert(0);
                *total = total.saturating_add(*count);
            }
        }
    }
    totals
}

/// Reads a user's history and reduces it to a preference profile
#[derive(Clone)]
pub struct PreferenceAggregator {
    store: Arc<dyn HistoryStore>,
}

impl PreferenceAggregator {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Preference profile for `user`, or `NoHistory` when nothing is recorded
    pub async fn aggregate(&self, user: &str) -> Result<Preferences> {
        let entries = self.store.list_by_user(user).await?;
        if entries.is_empty() {
            tracing::debug!(user = %user, "No history recorded");
            return Ok(Preferences::NoHistory);
        }

        let totals = aggregate_entries(&entries);
        tracing::debug!(user = %user, entries = entries.len(), tags = totals.len(), "Aggregated preferences");
        Ok(Preferences::Profile(totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, NewHistoryEntry};
    use crate::state::InMemoryStore;

    fn teddy() -> CatalogItem {
        CatalogItem::with_labels("Teddy Bear", "holiday/toys", ["teddy", "bear", "toys"])
    }

    fn lego() -> CatalogItem {
        CatalogItem::with_labels("Lego Set", "holiday/toys", ["lego", "set", "toys"])
    }

    fn stored(entries: Vec<NewHistoryEntry>) -> Vec<HistoryEntry> {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| HistoryEntry::from_new(entry, i as u64 + 1))
            .collect()
    }

    #[test]
    fn test_folds_single_and_many_snapshots() {
        let mut boosted = teddy().tags;
        for count in boosted.values_mut() {
            *count += 1;
        }

        let entries = stored(vec![
            NewHistoryEntry::search("u", "toys", &[teddy(), lego()]),
            NewHistoryEntry::boost("u", "Teddy Bear", boosted),
        ]);

        let totals = aggregate_entries(&entries);
        // search: all 1+1, boost: all 2
        assert_eq!(totals.get("all"), Some(&4));
        assert_eq!(totals.get("teddy"), Some(&1));
        assert_eq!(totals.get("toys"), Some(&1));
        assert_eq!(totals.get("lego"), Some(&0));
    }

    #[test]
    fn test_empty_snapshots_contribute_nothing() {
        let entries = stored(vec![NewHistoryEntry::search("u", "xyz", &[])]);
        assert!(aggregate_entries(&entries).is_empty());
    }

    #[test]
    fn test_order_independent() {
        let mut entries = stored(vec![
            NewHistoryEntry::search("u", "toys", &[teddy(), lego()]),
            NewHistoryEntry::boost("u", "Lego Set", lego().tags),
            NewHistoryEntry::search("u", "bear", &[teddy()]),
        ]);

        let forward = aggregate_entries(&entries);
        entries.reverse();
        let backward = aggregate_entries(&entries);
        entries.swap(0, 1);
        let shuffled = aggregate_entries(&entries);

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[tokio::test]
    async fn test_no_history() {
        let aggregator = PreferenceAggregator::new(Arc::new(InMemoryStore::new()));
        assert_eq!(aggregator.aggregate("nobody").await.unwrap(), Preferences::NoHistory);
    }

    #[tokio::test]
    async fn test_aggregate_reads_only_the_users_history() {
        let store = Arc::new(InMemoryStore::new());
        store
            .append(NewHistoryEntry::boost("alice", "Teddy Bear", teddy().tags))
            .await
            .unwrap();
        store
            .append(NewHistoryEntry::boost("bob", "Lego Set", lego().tags))
            .await
            .unwrap();

        let aggregator = PreferenceAggregator::new(store);
        let prefs = aggregator.aggregate("alice").await.unwrap();
        let tags = prefs.tags().unwrap();

        assert_eq!(tags.get("teddy"), Some(&0));
        assert!(tags.get("lego").is_none());
    }
}
