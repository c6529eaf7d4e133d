use cloudwright_spec::{ArchSpec, Severity, ValidationCheck, ValidationResult};

use crate::helpers::{encrypted_in_transit, services, unencrypted_stores};
use crate::service_sets::baa_eligible;

pub fn check(spec: &ArchSpec) -> ValidationResult {
    let svcs = services(spec);
    let mut checks = Vec::new();

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
        recommendation: "Set encryption=true in config for all RDS, S3, DynamoDB, and cache components.".into(),
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
        recommendation: "Use HTTPS or TLS for all connections. Avoid plain HTTP or FTP.".into(),
    });

    let has_logging = svcs.iter().any(|s| crate::service_sets::LOGGING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "audit_logging".into(),
        category: "monitoring".into(),
        passed: has_logging,
        severity: Severity::High,
        detail: if has_logging {
            "Audit logging component present".into()
        } else {
            "No logging/monitoring service found".into()
        },
        recommendation: "Add CloudWatch + CloudTrail (AWS), Cloud Logging (GCP), or Azure Monitor.".into(),
    });

    let has_auth = svcs.iter().any(|s| crate::service_sets::AUTH_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "access_control".into(),
        category: "identity".into(),
        passed: has_auth,
        severity: Severity::High,
        detail: if has_auth {
            "IAM/auth component present".into()
        } else {
            "No identity or access management service found".into()
        },
        recommendation: "Add Cognito/IAM (AWS), Firebase Auth (GCP), or Azure AD.".into(),
    });

    let provider_baa = baa_eligible(&spec.provider.to_string());
    let non_baa: Vec<&str> = spec
        .components
        .iter()
        .filter(|c| !provider_baa.contains(&c.service.as_str()))
        .map(|c| c.id.as_str())
        .collect();
    checks.push(ValidationCheck {
        name: "baa_eligible".into(),
        category: "compliance".into(),
        passed: non_baa.is_empty(),
        severity: Severity::High,
        detail: if non_baa.is_empty() {
            "All services are BAA-eligible".into()
        } else {
            format!("Services not confirmed BAA-eligible: {}", non_baa.join(", "))
        },
        recommendation: "Replace non-BAA services or confirm BAA coverage with your provider.".into(),
    });

    let passed = checks.iter().filter(|c| c.severity == Severity::Critical).all(|c| c.passed);
    let score = ValidationResult::score_from_checks(&checks);
    ValidationResult {
        framework: "HIPAA".into(),
        passed,
        score,
        checks,
    }
}
