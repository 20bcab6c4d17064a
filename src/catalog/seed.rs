use crate::error::{AppError, Result};
use crate::models::CatalogItem;
use serde::Deserialize;
use std::path::Path;

/// On-disk catalog seed
///
/// ```toml
/// [[items]]
/// name = "Teddy Bear"
/// link = "holiday/toys"
/// tags = { all = 1, teddy = 0, bear = 0, toys = 0 }
/// ```
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub items: Vec<CatalogItem>,
}

/// The catalog shipped with the service
pub fn default_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::with_labels("Teddy Bear", "holiday/toys", ["teddy", "bear", "toys"]),
        CatalogItem::with_labels("Lego Set", "holiday/toys", ["lego", "set", "toys"]),
        CatalogItem::with_labels(
            "Remote Control Car",
            "holiday/toys",
            ["remote", "control", "car", "toys"],
        ),
        CatalogItem::with_labels(
            "Holiday Candles",
            "holiday/home-decor",
            ["holiday", "candles", "home-decor"],
        ),
    ]
}

/// Read catalog items from a TOML seed file
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<CatalogItem>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!("Failed to read catalog seed {:?}: {}", path, e))
    })?;

    let seed: SeedFile = toml::from_str(&raw)?;
    tracing::info!(path = ?path, items = seed.items.len(), "Loaded catalog seed file");
    Ok(seed.items)
}
