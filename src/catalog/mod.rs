//! In-memory item catalog.
//!
//! The catalog is built once at startup from the built-in seed or a TOML seed
//! file. Names, links and tag labels never change afterwards; only tag
//! counters move, and each item guards its counters with its own lock so
//! boosts on different items never contend.
//!
//! Counters live for the process lifetime only: a restart re-seeds the
//! catalog and every boost applied so far is lost.

mod matcher;
mod seed;
mod store;

pub use matcher::{item_matches, normalize_query, search};
pub use seed::{default_items, load_seed_file, SeedFile};
pub use store::{CatalogStore, ItemGuard};
