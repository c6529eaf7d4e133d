use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ComputeFile {
    #[serde(default)]
    pub instances: Vec<InstanceSeed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstanceSeed {
    pub name: String,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub family_normalized: Option<String>,
    pub vcpus: i64,
    pub memory_gb: f64,
    #[serde(default)]
    pub storage_desc: Option<String>,
    #[serde(default)]
    pub gpu_count: i64,
    #[serde(default)]
    pub network_bandwidth: Option<String>,
    #[serde(default = "default_arch")]
    pub arch: String,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pricing: Vec<PricingSeed>,
}

fn default_arch() -> String {
    "x86_64".to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct PricingSeed {
    pub region: String,
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
    #[serde(default = "default_price_type")]
    pub price_type: String,
}

fn default_price_type() -> String {
    "on_demand".to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseFile {
    pub service: String,
    #[serde(default = "default_storage_per_gb")]
    pub storage_per_gb: f64,
    #[serde(default = "default_multi_az_multiplier")]
    pub multi_az_multiplier: f64,
    #[serde(default)]
    pub tiers: Vec<TierSeed>,
}

fn default_storage_per_gb() -> f64 {
    0.115
}

fn default_multi_az_multiplier() -> f64 {
    2.0
}

#[derive(Debug, Deserialize)]
pub(crate) struct TierSeed {
    pub name: String,
    #[serde(default)]
    pub pricing: BTreeMap<String, f64>,
    #[serde(default)]
    pub vcpus: i64,
    #[serde(default)]
    pub memory_gb: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EquivalencesFile {
    #[serde(default)]
    pub equivalences: Vec<EquivSeed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EquivSeed {
    #[serde(default)]
    pub aws: Option<String>,
    #[serde(default)]
    pub gcp: Option<String>,
    #[serde(default)]
    pub azure: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_match_type")]
    pub match_type: String,
}

fn default_confidence() -> f64 {
    0.8
}

fn default_match_type() -> String {
    "spec".to_string()
}
