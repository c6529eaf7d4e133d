//! Persistent keyed store of instance types, per-region prices, managed
//! service tiers, and cross-cloud equivalences, backed by an embedded
//! SQLite database that auto-seeds from bundled JSON on first use.
//!
//! See [`Catalog`] for the entry point.

mod error;
pub mod formula;
mod schema;
mod seed_data;
mod seed_types;
mod store;

pub use error::{CatalogIoError, Result};
pub use store::{pricing_multiplier, Catalog, CatalogStats, InstanceRow, SearchQuery};
