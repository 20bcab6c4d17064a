pub mod processor;

pub use processor::{CatalogProcessor, TagBoost};
