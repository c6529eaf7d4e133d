use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "USD".to_string()
}

/// The priced cost of a single component, in the order it appeared in
/// `ArchSpec.components`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCost {
    pub component_id: String,
    pub service: String,
    pub monthly: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Pricing output attached to an ArchSpec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub monthly_total: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<ComponentCost>,
    #[serde(default)]
    pub data_transfer_monthly: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub as_of: String,
}

impl CostEstimate {
    /// Rounds to 2 decimal places, matching the source's USD display convention.
    pub fn round_usd(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }
}
