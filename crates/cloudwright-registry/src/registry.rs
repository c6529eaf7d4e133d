use std::collections::BTreeMap;
use std::path::Path;

use crate::embedded::EMBEDDED_CATEGORY_FILES;
use crate::error::RegistryLoadError;
use crate::service_def::{RawCategoryFile, ServiceDef};

/// Summary counts for a loaded registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_services: usize,
    pub categories: usize,
    pub providers: usize,
    pub equivalences: usize,
    pub feature_parity_services: usize,
}

/// One entry of a feature-comparison table: the feature name plus whatever
/// `"{service}_{provider}"` support values were found.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureComparisonRow {
    pub feature: String,
    pub values: BTreeMap<String, serde_yaml::Value>,
}

type FeatureParity = BTreeMap<String, BTreeMap<String, serde_yaml::Value>>;

/// Registry of all cloud services loaded from declarative category files.
///
/// Loaded once, immutable after construction: `get`/`get_equivalent` are O(1)
/// map lookups with no locking.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    services: BTreeMap<(String, String), ServiceDef>,
    by_category: BTreeMap<String, Vec<ServiceDef>>,
    equivalences: Vec<BTreeMap<String, String>>,
    feature_parity: BTreeMap<String, FeatureParity>,
}

impl ServiceRegistry {
    /// Loads from the bundled category files compiled into the binary.
    pub fn load_embedded() -> Result<Self, RegistryLoadError> {
        let mut builder = RegistryBuilder::default();
        for (name, contents) in EMBEDDED_CATEGORY_FILES {
            builder.ingest(name, contents)?;
        }
        Ok(builder.finish())
    }

    /// Loads every `*.yaml` file in `dir`, sorted by filename, replacing the
    /// bundled data entirely. A YAML parse failure aborts the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RegistryLoadError> {
        let dir = dir.as_ref();
        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .map_err(|e| RegistryLoadError::Io(dir.display().to_string(), e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("yaml"))
            .collect();
        entries.sort_by_key(|e| e.file_name());

        let mut builder = RegistryBuilder::default();
        for entry in entries {
            let path = entry.path();
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| RegistryLoadError::Io(path.display().to_string(), e))?;
            builder.ingest(&path.display().to_string(), &contents)?;
        }
        Ok(builder.finish())
    }

    pub fn get(&self, provider: &str, service_key: &str) -> Option<&ServiceDef> {
        self.services
            .get(&(provider.to_string(), service_key.to_string()))
    }

    pub fn get_category(&self, category: &str) -> Vec<&ServiceDef> {
        self.by_category
            .get(category)
            .map(|v| v.iter().collect())
            .unwrap_or_default()
    }

    pub fn list_categories(&self) -> Vec<&str> {
        self.by_category.keys().map(String::as_str).collect()
    }

    pub fn list_providers(&self) -> Vec<&str> {
        let mut providers: Vec<&str> = self
            .services
            .keys()
            .map(|(provider, _)| provider.as_str())
            .collect();
        providers.sort_unstable();
        providers.dedup();
        providers
    }

    pub fn list_services(&self, provider: &str) -> Vec<&ServiceDef> {
        self.services
            .iter()
            .filter(|((p, _), _)| p == provider)
            .map(|(_, svc)| svc)
            .collect()
    }

    /// Returns the equivalent service key in another provider, or `None` if
    /// no equivalence group names both. Same provider on both sides returns
    /// the input unchanged.
    pub fn get_equivalent(
        &self,
        service_key: &str,
        from_provider: &str,
        to_provider: &str,
    ) -> Option<String> {
        if from_provider == to_provider {
            return Some(service_key.to_string());
        }
        self.equivalences.iter().find_map(|equiv| {
            if equiv.get(from_provider).map(String::as_str) == Some(service_key) {
                equiv.get(to_provider).cloned()
            } else {
                None
            }
        })
    }

    /// Pricing formula name for a service, defaulting to `per_hour` when the
    /// service is not registered.
    pub fn get_pricing_formula(&self, provider: &str, service_key: &str) -> String {
        self.get(provider, service_key)
            .map(|s| s.pricing_formula.clone())
            .unwrap_or_else(|| "per_hour".to_string())
    }

    pub fn get_default_config(
        &self,
        provider: &str,
        service_key: &str,
    ) -> BTreeMap<String, serde_yaml::Value> {
        self.get(provider, service_key)
            .map(|s| s.default_config.clone())
            .unwrap_or_default()
    }

    pub fn all_equivalences(&self) -> &[BTreeMap<String, String>] {
        &self.equivalences
    }

    pub fn get_feature_parity(&self, service_key: &str) -> FeatureParity {
        self.feature_parity.get(service_key).cloned().unwrap_or_default()
    }

    /// Compares features between two equivalent services, one row per
    /// feature name seen on either side.
    pub fn compare_features(&self, service_a: &str, service_b: &str) -> Vec<FeatureComparisonRow> {
        let empty = FeatureParity::new();
        let parity_a = self.feature_parity.get(service_a).unwrap_or(&empty);
        let parity_b = self.feature_parity.get(service_b).unwrap_or(&empty);

        let mut features: Vec<&String> = parity_a.keys().chain(parity_b.keys()).collect();
        features.sort();
        features.dedup();

        features
            .into_iter()
            .map(|feature| {
                let mut values = BTreeMap::new();
                if let Some(support) = parity_a.get(feature) {
                    for (provider, val) in support {
                        values.insert(format!("{service_a}_{provider}"), val.clone());
                    }
                }
                if let Some(support) = parity_b.get(feature) {
                    for (provider, val) in support {
                        values.insert(format!("{service_b}_{provider}"), val.clone());
                    }
                }
                FeatureComparisonRow {
                    feature: feature.clone(),
                    values,
                }
            })
            .collect()
    }

    /// Features a provider does NOT support for a service — useful for
    /// migration planning ("what will I lose moving RDS to Cloud SQL?").
    pub fn feature_gaps(&self, service_key: &str, provider: &str) -> Vec<String> {
        let parity = match self.feature_parity.get(service_key) {
            Some(p) => p,
            None => return Vec::new(),
        };
        parity
            .iter()
            .filter(|(_, support)| {
                matches!(
                    support.get(provider),
                    Some(v) if v.as_bool() == Some(false) || v.as_i64() == Some(0)
                )
            })
            .map(|(feature, _)| feature.clone())
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_services: self.services.len(),
            categories: self.by_category.len(),
            providers: self.list_providers().len(),
            equivalences: self.equivalences.len(),
            feature_parity_services: self.feature_parity.len(),
        }
    }
}

#[derive(Default)]
struct RegistryBuilder {
    services: BTreeMap<(String, String), ServiceDef>,
    by_category: BTreeMap<String, Vec<ServiceDef>>,
    equivalences: Vec<BTreeMap<String, String>>,
    feature_parity: BTreeMap<String, FeatureParity>,
}

impl RegistryBuilder {
    fn ingest(&mut self, file_name: &str, contents: &str) -> Result<(), RegistryLoadError> {
        let raw: RawCategoryFile =
            serde_yaml::from_str(contents).map_err(|source| RegistryLoadError::Parse {
                file: file_name.to_string(),
                source,
            })?;

        for (provider, provider_services) in &raw.services {
            for (service_key, svc) in provider_services {
                let defn = ServiceDef {
                    service_key: service_key.clone(),
                    provider: provider.clone(),
                    category: raw.category.clone(),
                    name: svc.name.clone().unwrap_or_else(|| service_key.clone()),
                    description: svc.description.clone(),
                    pricing_formula: svc.pricing_formula.clone(),
                    default_config: svc.default_config.clone(),
                };
                self.services
                    .insert((provider.clone(), service_key.clone()), defn.clone());
                self.by_category
                    .entry(raw.category.clone())
                    .or_default()
                    .push(defn);
            }
        }

        for equiv in &raw.equivalences {
            self.equivalences.push(equiv.clone());
        }

        for group in &raw.feature_parity {
            for (feature_name, provider_support) in &group.features {
                for svc_key in &group.equivalence {
                    let registered = ["aws", "gcp", "azure"]
                        .iter()
                        .any(|p| self.services.contains_key(&(p.to_string(), svc_key.clone())));
                    if registered {
                        self.feature_parity
                            .entry(svc_key.clone())
                            .or_default()
                            .insert(feature_name.clone(), provider_support.clone());
                    }
                }
            }
        }

        Ok(())
    }

    fn finish(self) -> ServiceRegistry {
        ServiceRegistry {
            services: self.services,
            by_category: self.by_category,
            equivalences: self.equivalences,
            feature_parity: self.feature_parity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_registry_without_error() {
        let registry = ServiceRegistry::load_embedded().unwrap();
        assert!(registry.stats().total_services > 0);
    }

    #[test]
    fn get_finds_ec2() {
        let registry = ServiceRegistry::load_embedded().unwrap();
        let svc = registry.get("aws", "ec2").unwrap();
        assert_eq!(svc.pricing_formula, "per_hour");
    }

    #[test]
    fn get_unknown_service_returns_none() {
        let registry = ServiceRegistry::load_embedded().unwrap();
        assert!(registry.get("aws", "not_a_real_service").is_none());
    }

    #[test]
    fn equivalence_resolves_across_providers() {
        let registry = ServiceRegistry::load_embedded().unwrap();
        assert_eq!(
            registry.get_equivalent("ec2", "aws", "gcp").as_deref(),
            Some("compute_engine")
        );
        assert_eq!(
            registry.get_equivalent("ec2", "aws", "azure").as_deref(),
            Some("virtual_machines")
        );
        assert_eq!(registry.get_equivalent("ec2", "aws", "aws").as_deref(), Some("ec2"));
        assert_eq!(registry.get_equivalent("nonexistent", "aws", "gcp"), None);
    }

    #[test]
    fn feature_gaps_lists_unsupported_features() {
        let registry = ServiceRegistry::load_embedded().unwrap();
        let gaps = registry.feature_gaps("firestore", "gcp");
        assert!(gaps.contains(&"global_tables".to_string()));
    }

    #[test]
    fn compare_features_merges_both_sides() {
        let registry = ServiceRegistry::load_embedded().unwrap();
        let rows = registry.compare_features("dynamodb", "firestore");
        assert!(rows.iter().any(|r| r.feature == "global_tables"));
    }
}
