//! Compliance framework checks, the architecture linter, and the
//! post-validation hardening pass.
//!
//! Every check here is pure in-memory computation over an [`ArchSpec`] —
//! no catalog or network access — so `Validator::validate` never suspends.

mod fedramp;
mod gdpr;
mod helpers;
mod hipaa;
mod linter;
mod pci_dss;
mod post_validate;
pub mod service_sets;
mod soc2;
mod well_architected;

use cloudwright_spec::{ArchSpec, ValidationResult};

pub use linter::{lint, LintSeverity, LintWarning};
pub use post_validate::post_validate;

/// Runs framework checks against an ArchSpec. `compliance` names are
/// case-insensitive; `pci-dss`/`pci_dss` and `soc2`/`soc 2` are both
/// accepted aliases for the same framework.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Validator
    }

    pub fn validate(&self, spec: &ArchSpec, compliance: &[String], well_architected: bool) -> Vec<ValidationResult> {
        let frameworks: Vec<String> = compliance.iter().map(|f| f.to_ascii_uppercase()).collect();
        let mut results = Vec::new();

        if frameworks.iter().any(|f| f == "HIPAA") {
            results.push(hipaa::check(spec));
        }
        if frameworks.iter().any(|f| f == "PCI-DSS" || f == "PCI_DSS") {
            results.push(pci_dss::check(spec));
        }
        if frameworks.iter().any(|f| f == "SOC2" || f == "SOC 2") {
            results.push(soc2::check(spec));
        }
        if frameworks.iter().any(|f| f == "FEDRAMP") {
            results.push(fedramp::check(spec));
        }
        if frameworks.iter().any(|f| f == "GDPR") {
            results.push(gdpr::check(spec));
        }
        if well_architected {
            results.push(well_architected::check(spec));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::{Component, Connection, Provider, Value};

    fn compliant_hipaa_spec() -> ArchSpec {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(Component {
            id: "db".into(),
            service: "rds".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 3,
            config: [("encryption".to_string(), Value::Bool(true))].into_iter().collect(),
        });
        spec.components.push(Component {
            id: "auth".into(),
            service: "cognito".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 0,
            config: Default::default(),
        });
        spec.components.push(Component {
            id: "logs".into(),
            service: "cloudtrail".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 4,
            config: Default::default(),
        });
        spec.connections.push(Connection {
            source: "auth".into(),
            target: "db".into(),
            label: String::new(),
            protocol: Some("HTTPS".into()),
            port: Some(443),
            estimated_monthly_gb: None,
        });
        spec
    }

    #[test]
    fn hipaa_compliant_spec_passes() {
        let result = Validator::new().validate(&compliant_hipaa_spec(), &["hipaa".to_string()], false);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].framework, "HIPAA");
        assert!(result[0].passed);
    }

    #[test]
    fn multiple_frameworks_can_run_together() {
        let result = Validator::new().validate(&compliant_hipaa_spec(), &["hipaa".to_string(), "soc2".to_string()], true);
        let frameworks: Vec<&str> = result.iter().map(|r| r.framework.as_str()).collect();
        assert!(frameworks.contains(&"HIPAA"));
        assert!(frameworks.contains(&"SOC 2"));
        assert!(frameworks.contains(&"Well-Architected"));
    }

    #[test]
    fn unknown_framework_name_is_skipped_silently() {
        let result = Validator::new().validate(&compliant_hipaa_spec(), &["not-a-framework".to_string()], false);
        assert!(result.is_empty());
    }

    #[test]
    fn score_reflects_failing_checks() {
        let mut spec = ArchSpec::new("bare", Provider::Aws, "us-east-1");
        spec.components.push(Component {
            id: "db".into(),
            service: "rds".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 3,
            config: Default::default(),
        });
        let result = Validator::new().validate(&spec, &["hipaa".to_string()], false);
        assert!(!result[0].passed);
        assert!(result[0].score < 1.0);
    }
}
