//! Catalog search service.
//!
//! Users search a fixed item catalog, boost an item's tags, and read back a
//! tag-frequency profile built from everything they searched and boosted.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod preferences;
pub mod processing;
pub mod state;

pub use error::{AppError, Result};
pub use processing::CatalogProcessor;
