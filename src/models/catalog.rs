use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag label -> counter
pub type TagCounts = BTreeMap<String, u64>;

/// Tag every catalog item carries
pub const ALL_TAG: &str = "all";

/// A searchable catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Display name, unique within the catalog (case-insensitive)
    pub name: String,

    /// Category path, e.g. `holiday/toys`
    pub link: String,

    /// Tag counters; keys are fixed once the catalog is built
    pub tags: TagCounts,
}

impl CatalogItem {
    /// Create a new item
    pub fn new(name: impl Into<String>, link: impl Into<String>, tags: TagCounts) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            tags,
        }
    }

    /// Build an item whose tags all start at zero except `all`, which starts at 1.
    pub fn with_labels<'a>(
        name: impl Into<String>,
        link: impl Into<String>,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut tags = TagCounts::new();
        tags.insert(ALL_TAG.to_string(), 1);
        for label in labels {
            tags.entry(label.to_string()).or_insert(0);
        }
        Self::new(name, link, tags)
    }

    /// Iterate tag labels
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}
