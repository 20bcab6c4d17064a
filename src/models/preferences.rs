use crate::models::TagCounts;

/// A user's aggregated tag profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preferences {
    /// The user has no recorded history
    NoHistory,
    /// Summed tag counts across every recorded snapshot
    Profile(TagCounts),
}

impl Preferences {
    pub fn tags(&self) -> Option<&TagCounts> {
        match self {
            Preferences::NoHistory => None,
            Preferences::Profile(tags) => Some(tags),
        }
    }
}
