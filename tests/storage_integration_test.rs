use catalog_search::{
    models::{CatalogItem, NewHistoryEntry, TagSnapshot},
    preferences::aggregate_entries,
    state::{HistoryStore, InMemoryStore, SledStore},
};
use futures::future::join_all;
use std::sync::Arc;
use tempfile::TempDir;

fn candles() -> CatalogItem {
    CatalogItem::with_labels(
        "Holiday Candles",
        "holiday/home-decor",
        ["holiday", "candles", "home-decor"],
    )
}

fn car() -> CatalogItem {
    CatalogItem::with_labels(
        "Remote Control Car",
        "holiday/toys",
        ["remote", "control", "car", "toys"],
    )
}

/// Test suite that runs against any HistoryStore implementation
async fn test_store_operations<S: HistoryStore + 'static>(store: Arc<S>) {
    // Test 1: Append search and boost entries
    let search = store
        .append(NewHistoryEntry::search("alice", "holiday", &[candles()]))
        .await
        .unwrap();
    assert_eq!(search.user, "alice");
    assert_eq!(search.query.as_deref(), Some("holiday"));
    assert!(search.name.is_none());

    let boost = store
        .append(NewHistoryEntry::boost("alice", "Remote Control Car", car().tags))
        .await
        .unwrap();
    assert!(boost.id > search.id);

    // Test 2: List returns insertion order
    let entries = store.list_by_user("alice").await.unwrap();
    assert_eq!(entries, vec![search, boost]);

    // Test 3: Other users see nothing
    assert!(store.list_by_user("bob").await.unwrap().is_empty());

    // Test 4: Count
    assert_eq!(store.count_entries().await.unwrap(), 2);

    // Test 5: Aggregation over stored entries
    let totals = aggregate_entries(&entries);
    assert_eq!(totals.get("all"), Some(&2));
    assert_eq!(totals.get("candles"), Some(&0));
    assert_eq!(totals.get("toys"), Some(&0));
}

async fn test_concurrent_appends<S: HistoryStore + 'static>(store: Arc<S>) {
    let tasks = (0..40).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .append(NewHistoryEntry::search("carol", format!("q{}", i), &[]))
                .await
        })
    });

    let mut ids: Vec<u64> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap().id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 40);

    let entries = store.list_by_user("carol").await.unwrap();
    assert_eq!(entries.len(), 40);
    assert!(entries.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert!(entries.iter().all(|e| e.tags == TagSnapshot::Many(Vec::new())));
}

#[tokio::test]
async fn test_in_memory_store() {
    test_store_operations(Arc::new(InMemoryStore::new())).await;
}

#[tokio::test]
async fn test_in_memory_concurrent_appends() {
    test_concurrent_appends(Arc::new(InMemoryStore::new())).await;
}

#[tokio::test]
async fn test_sled_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledStore::new(temp_dir.path()).unwrap());
    test_store_operations(store).await;
}

#[tokio::test]
async fn test_sled_concurrent_appends() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledStore::new(temp_dir.path()).unwrap());
    test_concurrent_appends(store).await;
}

#[tokio::test]
async fn test_sled_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = SledStore::new(temp_dir.path()).unwrap();
        store
            .append(NewHistoryEntry::boost("dave", "Holiday Candles", candles().tags))
            .await
            .unwrap();
        store.flush().await.unwrap();
    }

    let reopened = SledStore::new(temp_dir.path()).unwrap();
    let entries = reopened.list_by_user("dave").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].tags, TagSnapshot::Single(candles().tags));
}
