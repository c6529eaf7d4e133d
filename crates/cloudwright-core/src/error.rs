use thiserror::Error;

/// Top-level error taxonomy for the facade. Subsystem crates keep their own
/// typed errors (`cloudwright_spec::InvalidSpec`, `cloudwright_catalog::CatalogIoError`,
/// ...); this enum is what a caller driving the whole pipeline matches on.
///
/// `UnknownService`, `PricingUnavailable`, `AdapterAuthError`, and
/// `AdapterHTTPError` never construct this type directly — they are
/// degraded inline (Cost Engine Tier 3 fallback, GCP empty-result, and
/// `RefreshResult.errors` respectively) per the propagation policy. Only
/// `InvalidSpec` and `CatalogIoError` are fatal enough to surface here.
#[derive(Debug, Error)]
pub enum CloudwrightError {
    #[error("invalid architecture spec: {0}")]
    InvalidSpec(#[from] cloudwright_spec::InvalidSpec),

    #[error("catalog store error: {0}")]
    CatalogIo(#[from] cloudwright_catalog::CatalogIoError),

    #[error("registry load error: {0}")]
    RegistryLoad(#[from] cloudwright_registry::RegistryLoadError),

    #[error("malformed design contract: {0}")]
    MalformedContract(String),
}

pub type Result<T> = std::result::Result<T, CloudwrightError>;
