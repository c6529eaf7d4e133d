use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::boundary::Boundary;
use crate::component::Component;
use crate::connection::Connection;
use crate::constraints::Constraints;
use crate::cost::CostEstimate;
use crate::error::{InvalidSpec, Result};
use crate::ident::is_iac_safe;
use crate::provider::Provider;
use crate::value::ConfigMap;

fn default_version() -> i64 {
    1
}

fn default_provider() -> Provider {
    Provider::Aws
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// The canonical intermediate representation of a cloud architecture.
///
/// Created by an Architect or Importer; mutated only by replacement — callers
/// treat an ArchSpec as immutable and build a new one for every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchSpec {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: i64,
    #[serde(default = "default_provider")]
    pub provider: Provider,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boundaries: Vec<Boundary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<CostEstimate>,
    #[serde(default, skip_serializing_if = "ConfigMap::is_empty")]
    pub metadata: ConfigMap,
}

impl ArchSpec {
    pub fn new(name: impl Into<String>, provider: Provider, region: impl Into<String>) -> Self {
        ArchSpec {
            name: name.into(),
            version: default_version(),
            provider,
            region: region.into(),
            constraints: None,
            components: Vec::new(),
            connections: Vec::new(),
            boundaries: Vec::new(),
            cost_estimate: None,
            metadata: ConfigMap::new(),
        }
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Validates every invariant in §3: unique IaC-safe component ids,
    /// connections resolving to existing components, boundary parents
    /// resolving to existing boundaries, tiers in 0..=4.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for c in &self.components {
            if !is_iac_safe(&c.id) {
                return Err(InvalidSpec::BadComponentId(c.id.clone()));
            }
            if !seen.insert(c.id.as_str()) {
                return Err(InvalidSpec::DuplicateComponentId(c.id.clone()));
            }
            if !(0..=4).contains(&c.tier) {
                return Err(InvalidSpec::BadTier(c.id.clone(), c.tier));
            }
        }

        let component_ids: HashSet<&str> = self.components.iter().map(|c| c.id.as_str()).collect();
        for conn in &self.connections {
            if !component_ids.contains(conn.source.as_str()) {
                return Err(InvalidSpec::DanglingConnection(conn.source.clone()));
            }
            if !component_ids.contains(conn.target.as_str()) {
                return Err(InvalidSpec::DanglingConnection(conn.target.clone()));
            }
        }

        let boundary_ids: HashMap<&str, Option<&str>> = self
            .boundaries
            .iter()
            .map(|b| (b.id.as_str(), b.parent.as_deref()))
            .collect();
        for b in &self.boundaries {
            if !is_iac_safe(&b.id) {
                return Err(InvalidSpec::BadBoundaryId(b.id.clone()));
            }
            if let Some(parent) = &b.parent {
                if !boundary_ids.contains_key(parent.as_str()) {
                    return Err(InvalidSpec::DanglingBoundaryParent(
                        b.id.clone(),
                        parent.clone(),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(s: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Accepts either YAML or JSON, trying JSON first since valid JSON is
    /// (almost always) not valid YAML-the-other-way-round ambiguity-free.
    pub fn from_str_any(s: &str) -> anyhow::Result<Self> {
        if let Ok(spec) = serde_json::from_str::<ArchSpec>(s) {
            return Ok(spec);
        }
        Ok(serde_yaml::from_str(s)?)
    }
}

/// A cross-cloud repricing of an ArchSpec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub provider: Provider,
    pub monthly_total: f64,
    pub spec: ArchSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_differences: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::connection::Connection;

    fn sample() -> ArchSpec {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(Component {
            id: "web".into(),
            service: "ec2".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: Default::default(),
        });
        spec.components.push(Component {
            id: "db".into(),
            service: "rds".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 3,
            config: Default::default(),
        });
        spec.connections.push(Connection {
            source: "web".into(),
            target: "db".into(),
            label: String::new(),
            protocol: None,
            port: None,
            estimated_monthly_gb: None,
        });
        spec
    }

    #[test]
    fn valid_spec_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_dangling_connection() {
        let mut spec = sample();
        spec.connections[0].target = "ghost".into();
        assert_eq!(
            spec.validate().unwrap_err(),
            InvalidSpec::DanglingConnection("ghost".into())
        );
    }

    #[test]
    fn rejects_bad_component_id() {
        let mut spec = sample();
        spec.components[0].id = "1bad".into();
        spec.connections.clear();
        assert!(matches!(
            spec.validate().unwrap_err(),
            InvalidSpec::BadComponentId(_)
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut spec = sample();
        spec.components[1].id = "web".into();
        assert_eq!(
            spec.validate().unwrap_err(),
            InvalidSpec::DuplicateComponentId("web".into())
        );
    }

    #[test]
    fn rejects_bad_tier() {
        let mut spec = sample();
        spec.components[0].tier = 9;
        assert_eq!(
            spec.validate().unwrap_err(),
            InvalidSpec::BadTier("web".into(), 9)
        );
    }

    #[test]
    fn yaml_round_trip_preserves_fields() {
        let spec = sample();
        let yaml = spec.to_yaml().unwrap();
        let back = ArchSpec::from_yaml(&yaml).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn defaults_apply_on_missing_optional_fields() {
        let json = r#"{"name":"minimal","components":[]}"#;
        let spec = ArchSpec::from_json(json).unwrap();
        assert_eq!(spec.version, 1);
        assert_eq!(spec.provider, Provider::Aws);
        assert_eq!(spec.region, "us-east-1");
    }
}
