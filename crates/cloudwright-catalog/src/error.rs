use thiserror::Error;

/// Failure to open, create, or seed the catalog store. Fatal — raised to
/// the caller rather than degraded, because without a catalog nothing else
/// in the pricing path can proceed.
#[derive(Debug, Error)]
pub enum CatalogIoError {
    #[error("failed to open catalog store at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to seed catalog store: {0}")]
    Seed(#[source] rusqlite::Error),
    #[error("catalog query failed: {0}")]
    Query(#[source] rusqlite::Error),
    #[error("malformed seed data in {file}: {source}")]
    SeedData {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to load embedded service registry during seed: {0}")]
    Registry(#[source] cloudwright_registry::RegistryLoadError),
}

pub type Result<T> = std::result::Result<T, CatalogIoError>;
