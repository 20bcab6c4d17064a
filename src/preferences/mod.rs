//! Reduction of user history into tag preference profiles.

mod aggregator;

pub use aggregator::{aggregate_entries, PreferenceAggregator};
