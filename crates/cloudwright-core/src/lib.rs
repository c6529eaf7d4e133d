//! Facade tying together the Service Registry, Catalog Store, Cost Engine,
//! Provider Mapper, Validator, Differ, and Scorer into the single
//! `Cloudwright` entry point most callers want, plus the Catalog Refresh
//! Pipeline and the LLM JSON contract extractor.

mod error;
mod llm_contract;
pub mod observability;
mod refresh;

pub use error::{CloudwrightError, Result};
pub use llm_contract::{extract_json, parse_arch_spec, ContractError};
pub use refresh::{index_by_provider, refresh_catalog, RefreshResult, RefreshSummary};

use std::path::Path;
use std::sync::Arc;

use cloudwright_catalog::Catalog;
use cloudwright_cost::CostEngine;
use cloudwright_diff::diff;
use cloudwright_registry::ServiceRegistry;
use cloudwright_scorer::{ScoreResult, Scorer};
use cloudwright_spec::{ArchSpec, Alternative, CostEstimate, DiffResult, ValidationResult};
use cloudwright_validator::{lint, post_validate, LintWarning, Validator};

/// The whole Cloudwright pipeline behind one handle: a [`Catalog`] store
/// opened at a fixed path, and the bundled [`ServiceRegistry`], with every
/// component (Cost Engine, Validator, Differ, Scorer) constructed on
/// demand from them.
///
/// Cheap to clone — the catalog serializes its own writes internally, so
/// sharing one `Cloudwright` across tasks (e.g. a refresh running
/// alongside a read-only estimate) is safe.
#[derive(Clone)]
pub struct Cloudwright {
    catalog: Arc<Catalog>,
    registry: Arc<ServiceRegistry>,
}

impl Cloudwright {
    /// Opens the catalog store at `catalog_path` (creating and seeding it
    /// if it doesn't exist yet) and loads the bundled service registry.
    pub fn open(catalog_path: impl AsRef<Path>) -> Result<Self> {
        let catalog = Catalog::open(catalog_path)?;
        let registry = ServiceRegistry::load_embedded()?;
        Ok(Cloudwright { catalog: Arc::new(catalog), registry: Arc::new(registry) })
    }

    /// Builds a `Cloudwright` from an already-open catalog and registry —
    /// useful for tests that want a temp-file catalog and a registry
    /// loaded from a directory override.
    pub fn from_parts(catalog: Catalog, registry: ServiceRegistry) -> Self {
        Cloudwright { catalog: Arc::new(catalog), registry: Arc::new(registry) }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Runs structural validation, then returns the spec unchanged if
    /// valid — callers that want a hardened copy should call
    /// [`Cloudwright::harden`] instead.
    pub fn check(&self, spec: &ArchSpec) -> Result<()> {
        spec.validate().map_err(CloudwrightError::from)
    }

    /// Runs the Post-Validator's safe-default hardening pass.
    pub fn harden(&self, spec: &ArchSpec) -> ArchSpec {
        post_validate(spec)
    }

    /// Prices every component and returns the spec with `cost_estimate`
    /// populated (Cost Engine §4.5).
    pub fn price(&self, spec: &ArchSpec, pricing_tier: &str) -> ArchSpec {
        CostEngine::new(&self.catalog, &self.registry).price(spec, pricing_tier)
    }

    /// Computes a cost estimate without mutating the spec.
    pub fn estimate(&self, spec: &ArchSpec, pricing_tier: &str) -> CostEstimate {
        CostEngine::new(&self.catalog, &self.registry).estimate(spec, pricing_tier)
    }

    /// Re-prices `spec` under each of `providers`, for side-by-side
    /// provider comparison (Cost Engine + Provider Mapper, §4.5/§4.6).
    pub fn compare_providers(&self, spec: &ArchSpec, providers: &[&str]) -> Vec<Alternative> {
        CostEngine::new(&self.catalog, &self.registry).compare_providers(spec, providers)
    }

    /// Runs the named compliance frameworks (plus the Well-Architected
    /// review when `well_architected` is set) against `spec`.
    pub fn validate(&self, spec: &ArchSpec, compliance: &[String], well_architected: bool) -> Vec<ValidationResult> {
        Validator::new().validate(spec, compliance, well_architected)
    }

    /// Runs the architectural linter (§ supplemented features).
    pub fn lint(&self, spec: &ArchSpec) -> Vec<LintWarning> {
        lint(spec)
    }

    /// Structurally diffs two versions of an architecture (§4.8).
    pub fn diff(&self, old: &ArchSpec, new: &ArchSpec) -> DiffResult {
        diff(old, new)
    }

    /// Scores an architecture across the five weighted dimensions (§4.9).
    pub fn score(&self, spec: &ArchSpec) -> ScoreResult {
        Scorer::new().score(spec)
    }

    /// Refreshes live pricing from provider APIs into the catalog store
    /// (the Catalog Refresh Pipeline).
    pub async fn refresh(&self, provider: Option<&str>, category: Option<&str>, region: Option<&str>, dry_run: bool) -> RefreshSummary {
        refresh_catalog(Arc::clone(&self.catalog), provider, category, region, dry_run).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::Provider;

    fn temp_cloudwright() -> (Cloudwright, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::open(dir.path().join("catalog.sqlite")).unwrap();
        let registry = ServiceRegistry::load_embedded().unwrap();
        (Cloudwright::from_parts(catalog, registry), dir)
    }

    #[test]
    fn prices_and_scores_a_minimal_spec() {
        let (cw, _dir) = temp_cloudwright();
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(cloudwright_spec::Component {
            id: "web".to_string(),
            service: "ec2".to_string(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: Default::default(),
        });

        let priced = cw.price(&spec, "on_demand");
        assert!(priced.cost_estimate.is_some());

        let score = cw.score(&priced);
        assert!(score.overall >= 0.0);
    }

    #[test]
    fn diffs_two_specs() {
        let (cw, _dir) = temp_cloudwright();
        let old = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        let mut new = old.clone();
        new.components.push(cloudwright_spec::Component {
            id: "web".to_string(),
            service: "ec2".to_string(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: Default::default(),
        });

        let result = cw.diff(&old, &new);
        assert_eq!(result.added.len(), 1);
    }
}
