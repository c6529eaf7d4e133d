//! Provider-agnostic catalog of service *kinds* (compute/db/storage/...)
//! with cross-cloud equivalence groups and pricing-formula names.
//!
//! Loaded once from declarative YAML category files and immutable
//! thereafter; see [`ServiceRegistry`].

mod embedded;
mod error;
mod registry;
mod service_def;

pub use error::RegistryLoadError;
pub use registry::{FeatureComparisonRow, RegistryStats, ServiceRegistry};
pub use service_def::ServiceDef;

use once_cell::sync::OnceCell;

static SHARED: OnceCell<ServiceRegistry> = OnceCell::new();

/// Returns the shared registry singleton, loading the embedded data on
/// first access. Panics only if the bundled YAML itself fails to parse,
/// which would indicate a build-time defect, not a runtime condition.
pub fn shared_registry() -> &'static ServiceRegistry {
    SHARED.get_or_init(|| ServiceRegistry::load_embedded().expect("embedded registry data is valid"))
}
