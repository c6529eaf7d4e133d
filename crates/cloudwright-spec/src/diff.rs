use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub component_id: String,
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionChange {
    pub kind: ChangeKind,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Structural delta between two ArchSpecs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<FieldChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_changes: Vec<ConnectionChange>,
    #[serde(default)]
    pub cost_delta: f64,
    pub summary: String,
}
