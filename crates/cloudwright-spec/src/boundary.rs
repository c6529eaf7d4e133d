use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::value::ConfigMap;

/// An isolation container (VPC, subnet, account, region, ...) forming a tree
/// via `parent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub component_ids: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "ConfigMap::is_empty")]
    pub config: ConfigMap,
}
