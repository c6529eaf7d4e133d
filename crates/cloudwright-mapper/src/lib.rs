//! Cross-cloud service equivalence and instance-config key remapping.
//!
//! Used by the cost engine's provider comparison to translate a component
//! designed for one provider into its closest equivalent on another:
//! `get_equivalent_service` resolves the service key via the registry's
//! equivalence groups, `map_instance_config` rewrites instance-sizing keys
//! (`instance_type` -> `machine_type`/`vm_size`) using the catalog's
//! `equivalences` table.

use cloudwright_catalog::Catalog;
use cloudwright_registry::ServiceRegistry;
use cloudwright_spec::{ConfigMap, Value};

/// Config keys that name an instance/machine size, checked in this order
/// (first match wins), mirroring the provider-specific field names used
/// across AWS/GCP/Azure/managed-database configs.
const INSTANCE_KEYS: [&str; 5] = [
    "instance_type",
    "machine_type",
    "vm_size",
    "instance_class",
    "node_type",
];

/// Resolves the equivalent service key for `service_key` on `to_provider`,
/// via the registry's equivalence groups. `None` means no direct
/// equivalent is registered; callers fall back to keeping the original
/// service key and provider (the original's `differences.push("No direct
/// equivalent for ...")` path).
pub fn get_equivalent_service(
    registry: &ServiceRegistry,
    service_key: &str,
    from_provider: &str,
    to_provider: &str,
) -> Option<String> {
    registry.get_equivalent(service_key, from_provider, to_provider)
}

/// Rewrites an instance-sizing key in `config` to its cross-cloud
/// equivalent name and field, using the catalog's `equivalences` table.
/// Returns `config` unchanged (cloned) when no instance-sizing key is
/// present, the catalog has no equivalence row for it, or the lookup
/// errors — matching the original's broad catch-and-fall-back behavior,
/// since a missed mapping should never abort a comparison.
pub fn map_instance_config(
    catalog: &Catalog,
    config: &ConfigMap,
    from_provider: &str,
    to_provider: &str,
) -> ConfigMap {
    let found = INSTANCE_KEYS.iter().find_map(|key| {
        config
            .get(*key)
            .and_then(Value::as_str)
            .map(|name| (*key, name.to_string()))
    });

    let (instance_key, instance_name) = match found {
        Some(pair) => pair,
        None => return config.clone(),
    };

    let equiv_name = match catalog.equivalent_instance(&instance_name, from_provider, to_provider) {
        Ok(Some(name)) => name,
        Ok(None) | Err(_) => return config.clone(),
    };

    let target_key = target_instance_key(to_provider, instance_key);

    let mut new_config = config.clone();
    if target_key != instance_key {
        new_config.remove(instance_key);
    }
    new_config.insert(target_key.to_string(), Value::String(equiv_name));
    new_config
}

/// The config key that names instance size on `to_provider`, given the
/// key used on the source side. Only `instance_type` is ever renamed;
/// provider-specific keys like `instance_class` (RDS) pass through
/// unchanged since no other provider uses that field name.
fn target_instance_key(to_provider: &str, instance_key: &str) -> &'static str {
    match (to_provider, instance_key) {
        ("gcp", "instance_type") => "machine_type",
        ("azure", "instance_type") => "vm_size",
        (_, "instance_type") => "instance_type",
        (_, "machine_type") => "machine_type",
        (_, "vm_size") => "vm_size",
        (_, "instance_class") => "instance_class",
        (_, "node_type") => "node_type",
        _ => "instance_type",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_catalog::Catalog;

    fn test_catalog() -> (Catalog, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = Catalog::open(dir.path().join("catalog.db")).expect("open catalog");
        (catalog, dir)
    }

    #[test]
    fn equivalent_service_same_provider_is_identity() {
        let registry = cloudwright_registry::shared_registry();
        assert_eq!(
            get_equivalent_service(registry, "ec2", "aws", "aws").as_deref(),
            Some("ec2")
        );
    }

    #[test]
    fn unmapped_config_returns_unchanged() {
        let (catalog, _dir) = test_catalog();
        let mut config = ConfigMap::new();
        config.insert("memory_gb".to_string(), Value::Number(16.0));
        let mapped = map_instance_config(&catalog, &config, "aws", "gcp");
        assert_eq!(mapped, config);
    }

    #[test]
    fn config_without_instance_key_passes_through() {
        let (catalog, _dir) = test_catalog();
        let mut config = ConfigMap::new();
        config.insert("region".to_string(), Value::String("us-east-1".into()));
        let mapped = map_instance_config(&catalog, &config, "aws", "azure");
        assert_eq!(mapped.get("region"), config.get("region"));
        assert!(!mapped.contains_key("vm_size"));
    }

    #[test]
    fn target_key_renames_instance_type_per_provider() {
        assert_eq!(target_instance_key("gcp", "instance_type"), "machine_type");
        assert_eq!(target_instance_key("azure", "instance_type"), "vm_size");
        assert_eq!(target_instance_key("aws", "instance_type"), "instance_type");
        assert_eq!(target_instance_key("gcp", "instance_class"), "instance_class");
    }
}
