use crate::models::{CatalogItem, TagCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Tag counters captured when a history entry is written.
///
/// A boost records the boosted item's counters; a search records one map per
/// matched item, in match order. Snapshots are values, so later catalog
/// mutations never change recorded history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSnapshot {
    Single(TagCounts),
    Many(Vec<TagCounts>),
}

impl TagSnapshot {
    /// Every tag map in this snapshot
    pub fn maps(&self) -> Box<dyn Iterator<Item = &TagCounts> + '_> {
        match self {
            TagSnapshot::Single(tags) => Box::new(std::iter::once(tags)),
            TagSnapshot::Many(all) => Box::new(all.iter()),
        }
    }

    /// Number of tag maps in this snapshot
    pub fn len(&self) -> usize {
        match self {
            TagSnapshot::Single(_) => 1,
            TagSnapshot::Many(all) => all.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EntryKind {
    Search,
    Boost,
}

/// A history entry before the log has assigned it an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub user: String,
    pub name: Option<String>,
    pub query: Option<String>,
    pub tags: TagSnapshot,
}

impl NewHistoryEntry {
    /// Entry for a search that matched `results`
    pub fn search(user: impl Into<String>, query: impl Into<String>, results: &[CatalogItem]) -> Self {
        Self {
            user: user.into(),
            name: None,
            query: Some(query.into()),
            tags: TagSnapshot::Many(results.iter().map(|item| item.tags.clone()).collect()),
        }
    }

    /// Entry for a tag boost on `name`
    pub fn boost(user: impl Into<String>, name: impl Into<String>, tags: TagCounts) -> Self {
        Self {
            user: user.into(),
            name: Some(name.into()),
            query: None,
            tags: TagSnapshot::Single(tags),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self.tags {
            TagSnapshot::Single(_) => EntryKind::Boost,
            TagSnapshot::Many(_) => EntryKind::Search,
        }
    }
}

/// A stored, immutable history record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Monotonic id assigned by the log
    pub id: u64,

    /// Owning user
    pub user: String,

    /// Boosted item name
    pub name: Option<String>,

    /// Normalized search query
    pub query: Option<String>,

    /// Tag snapshot taken at write time
    pub tags: TagSnapshot,

    /// Insert timestamp
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Stamp a new entry with its id and insert time
    pub fn from_new(entry: NewHistoryEntry, id: u64) -> Self {
        Self {
            id,
            user: entry.user,
            name: entry.name,
            query: entry.query,
            tags: entry.tags,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self.tags {
            TagSnapshot::Single(_) => EntryKind::Boost,
            TagSnapshot::Many(_) => EntryKind::Search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teddy() -> CatalogItem {
        CatalogItem::with_labels("Teddy Bear", "holiday/toys", ["teddy", "bear", "toys"])
    }

    #[test]
    fn test_search_entry_snapshots_each_match() {
        let lego = CatalogItem::with_labels("Lego Set", "holiday/toys", ["lego", "set", "toys"]);
        let entry = NewHistoryEntry::search("u1", "toys", &[teddy(), lego]);

        assert_eq!(entry.kind(), EntryKind::Search);
        assert_eq!(entry.query.as_deref(), Some("toys"));
        assert!(entry.name.is_none());
        assert_eq!(entry.tags.len(), 2);
    }

    #[test]
    fn test_search_entry_without_matches_is_empty() {
        let entry = NewHistoryEntry::search("u1", "xyz", &[]);
        assert!(entry.tags.is_empty());
        assert_eq!(entry.tags.maps().count(), 0);
    }

    #[test]
    fn test_snapshot_is_detached_from_item() {
        let mut item = teddy();
        let entry = NewHistoryEntry::boost("u1", item.name.clone(), item.tags.clone());

        item.tags.insert("teddy".to_string(), 99);

        match entry.tags {
            TagSnapshot::Single(tags) => assert_eq!(tags.get("teddy"), Some(&0)),
            TagSnapshot::Many(_) => panic!("boost must record a single map"),
        }
    }

    #[test]
    fn test_entry_kind_labels() {
        assert_eq!(EntryKind::Search.to_string(), "search");
        assert_eq!(EntryKind::Boost.to_string(), "boost");
    }

    #[test]
    fn test_snapshot_json_shape() {
        let single = serde_json::to_value(TagSnapshot::Single(teddy().tags)).unwrap();
        assert_eq!(single["single"]["all"], 1);

        let many = serde_json::to_value(TagSnapshot::Many(vec![teddy().tags])).unwrap();
        assert_eq!(many["many"][0]["bear"], 0);
    }
}
