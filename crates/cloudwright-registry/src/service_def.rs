use std::collections::BTreeMap;

use serde::Deserialize;

/// A single cloud service definition, as declared in a registry category file.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    pub service_key: String,
    pub provider: String,
    pub category: String,
    pub name: String,
    pub description: String,
    pub pricing_formula: String,
    pub default_config: BTreeMap<String, serde_yaml::Value>,
}

/// Raw shape of one `services.<provider>.<service_key>` entry in a category file.
#[derive(Debug, Deserialize)]
pub(crate) struct RawServiceEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_formula")]
    pub pricing_formula: String,
    #[serde(default)]
    pub default_config: BTreeMap<String, serde_yaml::Value>,
}

fn default_formula() -> String {
    "per_hour".to_string()
}

/// Raw shape of an entire category YAML file.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCategoryFile {
    pub category: String,
    #[serde(default)]
    pub services: BTreeMap<String, BTreeMap<String, RawServiceEntry>>,
    #[serde(default)]
    pub equivalences: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub feature_parity: Vec<RawFeatureParityGroup>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeatureParityGroup {
    #[serde(default)]
    pub equivalence: Vec<String>,
    #[serde(default)]
    pub features: BTreeMap<String, BTreeMap<String, serde_yaml::Value>>,
}
