use crate::catalog::CatalogStore;
use crate::models::CatalogItem;

/// Lower-case a raw query. Returns `None` for blank queries.
///
/// Surrounding whitespace is kept: `"bear "` only matches text containing
/// `"bear "`.
pub fn normalize_query(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_lowercase())
    }
}

/// Substring match of an already-normalized query against a lower-cased name
/// or any tag label.
pub fn item_matches<'a>(
    query: &str,
    name_lower: &str,
    labels: impl IntoIterator<Item = &'a str>,
) -> bool {
    name_lower.contains(query) || labels.into_iter().any(|label| label.contains(query))
}

/// Items matching `query`, in catalog order.
///
/// Empty and whitespace-only queries match nothing.
pub async fn search(catalog: &CatalogStore, query: &str) -> Vec<CatalogItem> {
    let Some(query) = normalize_query(query) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    for slot in catalog.slots() {
        if item_matches(&query, &slot.name_lower, slot.labels.iter().map(String::as_str)) {
            results.push(catalog.snapshot_slot(slot).await);
        }
    }
    results
}
