use cloudwright_spec::{ArchSpec, Severity, ValidationCheck, ValidationResult};

use crate::helpers::{config_truthy, encrypted_in_transit, services, unencrypted_stores};
use crate::service_sets::{COMPUTE_SERVICES, LOGGING_SERVICES, WAF_SERVICES};

pub fn check(spec: &ArchSpec) -> ValidationResult {
    let svcs = services(spec);
    let mut checks = Vec::new();

    let has_waf = svcs.iter().any(|s| WAF_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "waf_present".into(),
        category: "network_security".into(),
        passed: has_waf,
        severity: Severity::High,
        detail: if has_waf {
            "WAF component present".into()
        } else {
            "No WAF service found".into()
        },
        recommendation: "Add WAF (AWS), Cloud Armor (GCP), or Azure WAF in front of public endpoints.".into(),
    });

    let segmented = has_waf
        || spec.components.iter().any(|c| {
            COMPUTE_SERVICES.contains(&c.service.as_str())
                && (config_truthy(c, "security_groups") || config_truthy(c, "private_subnet"))
        });
    checks.push(ValidationCheck {
        name: "network_segmentation".into(),
        category: "network_security".into(),
        passed: segmented,
        severity: Severity::High,
        detail: if segmented {
            "Network segmentation controls present".into()
        } else {
            "No network segmentation (WAF or subnet isolation) detected".into()
        },
        recommendation: "Use private subnets, security groups, and WAF for cardholder data environment isolation."
            .into(),
    });

    let unencrypted = unencrypted_stores(spec);
    checks.push(ValidationCheck {
        name: "encryption".into(),
        category: "data_protection".into(),
        passed: unencrypted.is_empty(),
        severity: Severity::Critical,
        detail: if unencrypted.is_empty() {
            "Data stores encrypted".into()
        } else {
            format!("Unencrypted stores: {}", unencrypted.join(", "))
        },
        recommendation: "Enable encryption at rest on all storage and database components.".into(),
    });

    let in_transit = encrypted_in_transit(spec);
    checks.push(ValidationCheck {
        name: "encryption_in_transit".into(),
        category: "data_protection".into(),
        passed: in_transit,
        severity: Severity::Critical,
        detail: if in_transit {
            "Connections use TLS/HTTPS".into()
        } else {
            "Unencrypted connections present".into()
        },
        recommendation: "Enforce TLS 1.2+ on all service connections.".into(),
    });

    let has_logging = svcs.iter().any(|s| LOGGING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "logging".into(),
        category: "monitoring".into(),
        passed: has_logging,
        severity: Severity::High,
        detail: if has_logging {
            "Audit trail component present".into()
        } else {
            "No logging service found".into()
        },
        recommendation: "Add CloudTrail (AWS), Cloud Logging (GCP), or Azure Monitor for PCI audit trail.".into(),
    });

    let passed = checks.iter().filter(|c| c.severity == Severity::Critical).all(|c| c.passed);
    let score = ValidationResult::score_from_checks(&checks);
    ValidationResult {
        framework: "PCI-DSS".into(),
        passed,
        score,
        checks,
    }
}
