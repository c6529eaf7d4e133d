use cloudwright_spec::{ArchSpec, Severity, ValidationCheck, ValidationResult};

use crate::helpers::{config_truthy, encrypted_in_transit, services, unencrypted_stores};
use crate::service_sets::{is_eu_region, AUTH_SERVICES, DATA_STORE_SERVICES, LOGGING_SERVICES, STORAGE_SERVICES};

fn effective_region(spec: &ArchSpec) -> &str {
    spec.constraints
        .as_ref()
        .and_then(|c| c.regions.first())
        .map(String::as_str)
        .unwrap_or(spec.region.as_str())
}

pub fn check(spec: &ArchSpec) -> ValidationResult {
    let svcs = services(spec);
    let mut checks = Vec::new();

    let region = effective_region(spec);
    let region_ok = is_eu_region(region);
    checks.push(ValidationCheck {
        name: "data_residency".into(),
        category: "data_protection".into(),
        passed: region_ok,
        severity: Severity::Critical,
        detail: if region_ok {
            format!("Region {region} is within the approved EU data residency zone")
        } else {
            format!("Region {region} is outside the approved EU data residency zone")
        },
        recommendation: "Deploy all components to an EU region (eu-*).".into(),
    });

    let unencrypted = unencrypted_stores(spec);
    checks.push(ValidationCheck {
        name: "encryption_at_rest".into(),
        category: "data_protection".into(),
        passed: unencrypted.is_empty(),
        severity: Severity::Critical,
        detail: if unencrypted.is_empty() {
            "All data stores have encryption enabled".into()
        } else {
            format!("Missing encryption on: {}", unencrypted.join(", "))
        },
        recommendation: "Set encryption=true on all data stores holding personal data.".into(),
    });

    let in_transit = encrypted_in_transit(spec);
    checks.push(ValidationCheck {
        name: "encryption_in_transit".into(),
        category: "data_protection".into(),
        passed: in_transit,
        severity: Severity::Critical,
        detail: if in_transit {
            "All connections use encrypted protocols".into()
        } else {
            "One or more connections use unencrypted protocols".into()
        },
        recommendation: "Use HTTPS or TLS for all connections carrying personal data.".into(),
    });

    let has_auth = svcs.iter().any(|s| AUTH_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "access_controls".into(),
        category: "identity".into(),
        passed: has_auth,
        severity: Severity::High,
        detail: if has_auth {
            "Access control service present".into()
        } else {
            "No access control service found".into()
        },
        recommendation: "Add Cognito/IAM, Firebase Auth, or Azure AD to restrict access to personal data.".into(),
    });

    let has_logging = svcs.iter().any(|s| LOGGING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "audit_trail".into(),
        category: "monitoring".into(),
        passed: has_logging,
        severity: Severity::High,
        detail: if has_logging {
            "Audit trail component present".into()
        } else {
            "No audit logging service found".into()
        },
        recommendation: "Add CloudWatch/CloudTrail, Cloud Logging, or Azure Monitor to track data access.".into(),
    });

    let has_deletion = spec.components.iter().any(|c| {
        (DATA_STORE_SERVICES.contains(&c.service.as_str()) || STORAGE_SERVICES.contains(&c.service.as_str()))
            && (config_truthy(c, "ttl") || config_truthy(c, "lifecycle") || config_truthy(c, "retention_days"))
    });
    checks.push(ValidationCheck {
        name: "data_deletion_capability".into(),
        category: "data_protection".into(),
        passed: has_deletion,
        severity: Severity::Medium,
        detail: if has_deletion {
            "A data-deletion mechanism (ttl/lifecycle/retention) is configured".into()
        } else {
            "No ttl, lifecycle, or retention_days configured on any data store".into()
        },
        recommendation: "Configure ttl, lifecycle, or retention_days on data stores to honor erasure requests.".into(),
    });

    let passed = checks.iter().filter(|c| c.severity == Severity::Critical).all(|c| c.passed);
    let score = ValidationResult::score_from_checks(&checks);
    ValidationResult {
        framework: "GDPR".into(),
        passed,
        score,
        checks,
    }
}
