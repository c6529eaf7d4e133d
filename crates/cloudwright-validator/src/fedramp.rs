use cloudwright_spec::{ArchSpec, Severity, ValidationCheck, ValidationResult};

use crate::helpers::{services, unencrypted_stores};
use crate::service_sets::{is_us_region, ALERTING_SERVICES, AUTH_SERVICES, LOGGING_SERVICES};

/// The region a spec is actually deployed in for compliance purposes:
/// `constraints.regions[0]` when set, falling back to `spec.region`.
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

    let unencrypted = unencrypted_stores(spec);
    checks.push(ValidationCheck {
        name: "fips_encryption".into(),
        category: "data_protection".into(),
        passed: unencrypted.is_empty(),
        severity: Severity::Critical,
        detail: if unencrypted.is_empty() {
            "All data stores have encryption enabled".into()
        } else {
            format!("Missing encryption on: {}", unencrypted.join(", "))
        },
        recommendation: "Enable FIPS 140-2 validated encryption at rest on all data stores.".into(),
    });

    let region = effective_region(spec);
    let region_ok = is_us_region(region);
    checks.push(ValidationCheck {
        name: "authorized_regions".into(),
        category: "data_protection".into(),
        passed: region_ok,
        severity: Severity::Critical,
        detail: if region_ok {
            format!("Region {region} is an authorized US/GovCloud region")
        } else {
            format!("Region {region} is not an authorized FedRAMP region")
        },
        recommendation: "Deploy only to US (us-*) or GovCloud (us-gov-*) regions.".into(),
    });

    let has_auth = svcs.iter().any(|s| AUTH_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "multi_factor_auth".into(),
        category: "identity".into(),
        passed: has_auth,
        severity: Severity::Critical,
        detail: if has_auth {
            "Auth service present for MFA enforcement".into()
        } else {
            "No identity/auth service found to enforce MFA".into()
        },
        recommendation: "Add Cognito, IAM, or Azure AD with MFA enforced.".into(),
    });

    let has_logging = svcs.iter().any(|s| LOGGING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "audit_logging".into(),
        category: "monitoring".into(),
        passed: has_logging,
        severity: Severity::Critical,
        detail: if has_logging {
            "Audit logging component present".into()
        } else {
            "No audit logging service found".into()
        },
        recommendation: "Add CloudTrail, Cloud Logging, or Azure Monitor.".into(),
    });

    checks.push(ValidationCheck {
        name: "access_control".into(),
        category: "identity".into(),
        passed: has_auth,
        severity: Severity::High,
        detail: if has_auth {
            "Access control service present".into()
        } else {
            "No access control service found".into()
        },
        recommendation: "Add an IAM/auth service and enforce least-privilege roles.".into(),
    });

    let has_monitoring = svcs.iter().any(|s| LOGGING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "continuous_monitoring".into(),
        category: "monitoring".into(),
        passed: has_monitoring,
        severity: Severity::High,
        detail: if has_monitoring {
            "Continuous monitoring service present".into()
        } else {
            "No continuous monitoring service found".into()
        },
        recommendation: "Add CloudWatch, Cloud Logging, or Azure Monitor for continuous monitoring.".into(),
    });

    let has_alerting = svcs.iter().any(|s| ALERTING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "incident_response".into(),
        category: "operations".into(),
        passed: has_alerting,
        severity: Severity::Medium,
        detail: if has_alerting {
            "Alerting/notification service present for incident response".into()
        } else {
            "No alerting service found for incident response".into()
        },
        recommendation: "Add SNS, Pub/Sub, or Event Grid to page on-call for incidents.".into(),
    });

    let passed = checks.iter().filter(|c| c.severity == Severity::Critical).all(|c| c.passed);
    let score = ValidationResult::score_from_checks(&checks);
    ValidationResult {
        framework: "FedRAMP Moderate".into(),
        passed,
        score,
        checks,
    }
}
