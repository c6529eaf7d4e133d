//! Cost engine — prices each component in an ArchSpec from catalog data.
//!
//! Three-tier resolution per component: catalog-backed pricing (instance
//! lookups, managed-service tiers), a named pricing formula from the
//! service's registry entry, then a static fallback table. Post-resolution
//! multipliers for multi-AZ and container-orchestration sizing apply only
//! outside the catalog tier, which already bakes them into its own prices.

use std::collections::{BTreeMap, HashMap};

use cloudwright_catalog::{formula, pricing_multiplier, Catalog};
use cloudwright_registry::ServiceRegistry;
use cloudwright_spec::{Alternative, ArchSpec, Component, ComponentCost, CostEstimate, ConfigMap, Value};

/// Service keys that run as orchestrated container fleets; these default to
/// a 3x sizing multiplier unless the config states an explicit node/task
/// count greater than one.
const CONTAINER_ORCHESTRATION: [&str; 4] = ["eks", "gke", "aks", "ecs"];

/// Per-provider internet egress rate, in $/GB, used when a connection has
/// no more specific override.
fn egress_internet_rate(provider: &str) -> f64 {
    match provider {
        "aws" => 0.09,
        "gcp" => 0.12,
        "azure" => 0.087,
        _ => DEFAULT_EGRESS_RATE,
    }
}

/// Flat rate applied whenever source and target components sit on
/// different providers — cross-cloud egress is never cheaper than this.
const CROSS_PROVIDER_EGRESS_RATE: f64 = 0.09;

/// Per-service egress overrides for same-provider transfer (CDN/LB/object
/// storage all negotiate or discount below plain internet egress).
const SERVICE_EGRESS_OVERRIDES: &[(&str, f64)] = &[
    ("cloudfront", 0.085),
    ("cloud_cdn", 0.08),
    ("azure_cdn", 0.087),
    ("alb", 0.01),
    ("nlb", 0.01),
    ("app_gateway", 0.01),
    ("s3", 0.01),
    ("cloud_storage", 0.01),
    ("blob_storage", 0.01),
];

const DEFAULT_EGRESS_RATE: f64 = 0.09;

fn round_usd(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Prices every component in an ArchSpec and returns a full cost breakdown.
pub struct CostEngine<'a> {
    catalog: &'a Catalog,
    registry: &'a ServiceRegistry,
}

impl<'a> CostEngine<'a> {
    pub fn new(catalog: &'a Catalog, registry: &'a ServiceRegistry) -> Self {
        CostEngine { catalog, registry }
    }

    /// Prices every component, summing in estimated data-transfer cost.
    pub fn estimate(&self, spec: &ArchSpec, pricing_tier: &str) -> CostEstimate {
        let mut breakdown = Vec::with_capacity(spec.components.len());
        for comp in &spec.components {
            let monthly = self.price_component(comp, &spec.provider.to_string(), pricing_tier);
            let hourly = if monthly > 0.0 {
                Some((monthly / 730.0 * 10_000.0).round() / 10_000.0)
            } else {
                None
            };
            breakdown.push(ComponentCost {
                component_id: comp.id.clone(),
                service: comp.service.clone(),
                monthly,
                hourly,
                notes: cost_notes(comp),
            });
        }

        let component_total = round_usd(breakdown.iter().map(|c| c.monthly).sum());
        let data_transfer = self.estimate_data_transfer(spec);
        let total = round_usd(component_total + data_transfer);

        CostEstimate {
            monthly_total: total,
            breakdown,
            data_transfer_monthly: data_transfer,
            currency: "USD".to_string(),
            as_of: chrono::Utc::now().date_naive().to_string(),
        }
    }

    /// Estimates costs and returns a new ArchSpec with `cost_estimate` set.
    pub fn price(&self, spec: &ArchSpec, pricing_tier: &str) -> ArchSpec {
        let estimate = self.estimate(spec, pricing_tier);
        let mut priced = spec.clone();
        priced.cost_estimate = Some(estimate);
        priced
    }

    /// Prices the architecture across alternate providers, remapping each
    /// component to its cross-cloud equivalent service and instance
    /// sizing where the registry and catalog have one.
    pub fn compare_providers(&self, spec: &ArchSpec, providers: &[&str]) -> Vec<Alternative> {
        let mut alternatives = Vec::new();
        let source_provider = spec.provider.to_string();

        for &target_provider in providers {
            if target_provider == source_provider {
                continue;
            }

            let mut mapped_components = Vec::with_capacity(spec.components.len());
            let mut differences = Vec::new();

            for comp in &spec.components {
                let comp_provider = comp.provider.to_string();
                let equiv_service = cloudwright_mapper::get_equivalent_service(
                    self.registry,
                    &comp.service,
                    &comp_provider,
                    target_provider,
                );

                let mut new_comp = comp.clone();
                match equiv_service {
                    Some(equiv) => {
                        new_comp.config = cloudwright_mapper::map_instance_config(
                            self.catalog,
                            &comp.config,
                            &comp_provider,
                            target_provider,
                        );
                        if equiv != comp.service {
                            differences.push(format!("{equiv} instead of {}", comp.service));
                        }
                        new_comp.service = equiv;
                    }
                    None => {
                        differences.push(format!("No direct equivalent for {}", comp.service));
                    }
                }
                new_comp.provider = target_provider.parse().unwrap_or(spec.provider);
                mapped_components.push(new_comp);
            }

            let mut alt_spec = spec.clone();
            alt_spec.provider = target_provider.parse().unwrap_or(spec.provider);
            alt_spec.components = mapped_components;

            let alt_estimate = self.estimate(&alt_spec, "on_demand");
            differences.truncate(5);

            alternatives.push(Alternative {
                provider: alt_spec.provider,
                monthly_total: alt_estimate.monthly_total,
                spec: alt_spec,
                key_differences: differences,
            });
        }

        alternatives
    }

    /// Monthly cost for a single component, via the three-tier pipeline
    /// plus post-resolution multipliers.
    fn price_component(&self, comp: &Component, _default_provider: &str, pricing_tier: &str) -> f64 {
        let provider = comp.provider.to_string();
        let provider = provider.as_str();
        let config = &comp.config;

        let mut from_catalog = false;
        let mut base = self
            .catalog
            .get_service_pricing(&comp.service, provider, config, pricing_tier)
            .ok()
            .flatten();
        if base.is_some() {
            from_catalog = true;
        }

        if base.is_none() {
            if let Some(svc_def) = self.registry.get(provider, &comp.service) {
                let merged = merge_configs(&svc_def.default_config, config);
                if let Some(result) = formula::dispatch(&svc_def.pricing_formula, &merged, 0.0) {
                    if result > 0.0 {
                        base = Some(result * pricing_multiplier(pricing_tier));
                    }
                }
            }
        }

        let mut base = match base {
            Some(b) => b,
            None => formula::default_managed_price(&comp.service, config) * pricing_multiplier(pricing_tier),
        };

        if !from_catalog && config.get("multi_az").and_then(Value::as_bool).unwrap_or(false) {
            base *= 2.0;
        }

        if CONTAINER_ORCHESTRATION.contains(&comp.service.as_str()) {
            let has_explicit_count = config.get("count").and_then(Value::as_f64).unwrap_or(1.0) > 1.0
                || config.get("node_count").and_then(Value::as_f64).unwrap_or(0.0) > 1.0
                || config.get("desired_count").and_then(Value::as_f64).unwrap_or(0.0) > 1.0;
            if !has_explicit_count {
                base *= 3.0;
            }
        }

        round_usd(base)
    }

    /// Sums estimated monthly egress cost across every connection with an
    /// `estimated_monthly_gb` set.
    fn estimate_data_transfer(&self, spec: &ArchSpec) -> f64 {
        let component_map: HashMap<&str, &Component> =
            spec.components.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut total = 0.0;
        for conn in &spec.connections {
            let gb = match conn.estimated_monthly_gb {
                Some(gb) if gb > 0.0 => gb,
                _ => continue,
            };
            let source = match component_map.get(conn.source.as_str()) {
                Some(c) => *c,
                None => continue,
            };
            let target = component_map.get(conn.target.as_str()).copied();

            let src_provider = source.provider.to_string();
            let tgt_provider = target
                .map(|t| t.provider.to_string())
                .unwrap_or_else(|| src_provider.clone());
            let cross_provider = tgt_provider != src_provider;

            let rate = if cross_provider {
                CROSS_PROVIDER_EGRESS_RATE
            } else if let Some((_, r)) = SERVICE_EGRESS_OVERRIDES.iter().find(|(s, _)| *s == source.service) {
                *r
            } else {
                egress_internet_rate(&src_provider)
            };

            total += gb * rate;
        }

        round_usd(total)
    }
}

/// Builds a human-readable note for a cost line item from the fields
/// present on its config, in priority order.
fn cost_notes(comp: &Component) -> String {
    let config = &comp.config;
    let mut parts = Vec::new();

    for key in ["instance_type", "instance_class", "node_type", "tier", "vm_size"] {
        if let Some(v) = config.get(key).and_then(Value::as_str) {
            parts.push(v.to_string());
            break;
        }
    }

    if config.get("count").and_then(Value::as_f64).unwrap_or(1.0) > 1.0 {
        if let Some(n) = config.get("count").and_then(Value::as_f64) {
            parts.push(format!("{}x", n as i64));
        }
    }

    if config.get("multi_az").and_then(Value::as_bool).unwrap_or(false) {
        parts.push("Multi-AZ".to_string());
    }

    if let Some(gb) = config.get("storage_gb").and_then(Value::as_f64) {
        if gb > 0.0 {
            parts.push(format!("{}GB storage", gb as i64));
        }
    }

    if let Some(gb) = config.get("estimated_gb").and_then(Value::as_f64) {
        if gb > 0.0 {
            parts.push(format!("{}GB egress", gb as i64));
        }
    }

    if let Some(engine) = config.get("engine").and_then(Value::as_str) {
        parts.push(engine.to_string());
    }

    parts.join(", ")
}

/// Overlays a component's config onto a service's registry-declared
/// defaults, converting the registry's YAML values into the spec's
/// dynamic `Value` type.
fn merge_configs(defaults: &BTreeMap<String, serde_yaml::Value>, overrides: &ConfigMap) -> ConfigMap {
    let mut merged: ConfigMap = defaults
        .iter()
        .filter_map(|(k, v)| yaml_to_value(v).map(|v| (k.clone(), v)))
        .collect();
    for (k, v) in overrides {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

fn yaml_to_value(v: &serde_yaml::Value) -> Option<Value> {
    serde_json::to_value(v)
        .ok()
        .and_then(|json| serde_json::from_value(json).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::{Component, Connection, Provider};

    fn test_catalog() -> (Catalog, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = Catalog::open(dir.path().join("catalog.db")).expect("open catalog");
        (catalog, dir)
    }

    fn ec2_component(instance_type: &str) -> Component {
        let mut config = ConfigMap::new();
        config.insert("instance_type".to_string(), Value::String(instance_type.to_string()));
        Component {
            id: "web".to_string(),
            service: "ec2".to_string(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config,
        }
    }

    #[test]
    fn estimate_prices_known_instance() {
        let (catalog, _dir) = test_catalog();
        let registry = cloudwright_registry::shared_registry();
        let engine = CostEngine::new(&catalog, registry);

        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(ec2_component("t3.medium"));

        let estimate = engine.estimate(&spec, "on_demand");
        assert_eq!(estimate.breakdown.len(), 1);
        assert!(estimate.monthly_total >= 0.0);
    }

    #[test]
    fn unknown_service_falls_back_to_static_table() {
        let (catalog, _dir) = test_catalog();
        let registry = cloudwright_registry::shared_registry();
        let engine = CostEngine::new(&catalog, registry);

        let comp = Component {
            id: "svc".to_string(),
            service: "bespoke_appliance".to_string(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: ConfigMap::new(),
        };
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(comp);

        let estimate = engine.estimate(&spec, "on_demand");
        assert_eq!(estimate.breakdown[0].monthly, 10.0);
    }

    #[test]
    fn cross_provider_connection_uses_flat_egress_rate() {
        let (catalog, _dir) = test_catalog();
        let registry = cloudwright_registry::shared_registry();
        let engine = CostEngine::new(&catalog, registry);

        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(Component {
            id: "a".to_string(),
            service: "ec2".to_string(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: ConfigMap::new(),
        });
        spec.components.push(Component {
            id: "b".to_string(),
            service: "compute_engine".to_string(),
            provider: Provider::Gcp,
            label: None,
            description: String::new(),
            tier: 2,
            config: ConfigMap::new(),
        });
        spec.connections.push(Connection {
            source: "a".to_string(),
            target: "b".to_string(),
            label: String::new(),
            protocol: None,
            port: None,
            estimated_monthly_gb: Some(100.0),
        });

        let estimate = engine.estimate(&spec, "on_demand");
        assert_eq!(estimate.data_transfer_monthly, 9.0);
    }

    #[test]
    fn reserved_tier_discounts_static_fallback_price() {
        let (catalog, _dir) = test_catalog();
        let registry = cloudwright_registry::shared_registry();
        let engine = CostEngine::new(&catalog, registry);

        let comp = Component {
            id: "svc".to_string(),
            service: "bespoke_appliance".to_string(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: ConfigMap::new(),
        };
        let mut on_demand_spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        on_demand_spec.components.push(comp.clone());
        let on_demand = engine.estimate(&on_demand_spec, "on_demand");

        let mut spot_spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spot_spec.components.push(comp);
        let spot = engine.estimate(&spot_spec, "spot");

        assert!(spot.monthly_total < on_demand.monthly_total);
    }
}
