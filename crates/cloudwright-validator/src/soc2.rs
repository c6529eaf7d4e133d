use cloudwright_spec::{ArchSpec, Severity, ValidationCheck, ValidationResult};

use crate::helpers::{config_truthy, services};
use crate::service_sets::{AUTH_SERVICES, CICD_SERVICES, LB_SERVICES, LOGGING_SERVICES};

pub fn check(spec: &ArchSpec) -> ValidationResult {
    let svcs = services(spec);
    let mut checks = Vec::new();

    let has_logging = svcs.iter().any(|s| LOGGING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "logging".into(),
        category: "monitoring".into(),
        passed: has_logging,
        severity: Severity::High,
        detail: if has_logging {
            "Logging component present".into()
        } else {
            "No logging service found".into()
        },
        recommendation: "Add CloudWatch, Cloud Logging, or Azure Monitor.".into(),
    });

    let has_auth = svcs.iter().any(|s| AUTH_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "access_controls".into(),
        category: "identity".into(),
        passed: has_auth,
        severity: Severity::High,
        detail: if has_auth {
            "Auth/IAM component present".into()
        } else {
            "No auth service found".into()
        },
        recommendation: "Add IAM, Cognito, Firebase Auth, or Azure AD.".into(),
    });

    let multi_az = spec
        .components
        .iter()
        .any(|c| config_truthy(c, "multi_az") || config_truthy(c, "multi_region"));
    let has_lb = svcs.iter().any(|s| LB_SERVICES.contains(s));
    let availability_ok = multi_az || has_lb;
    checks.push(ValidationCheck {
        name: "availability".into(),
        category: "reliability".into(),
        passed: availability_ok,
        severity: Severity::Medium,
        detail: if availability_ok {
            "High-availability configuration detected".into()
        } else {
            "No multi-AZ or load balancer found — single point of failure risk".into()
        },
        recommendation: "Enable multi_az on databases, use a load balancer, and configure auto-scaling.".into(),
    });

    let has_cicd = svcs.iter().any(|s| CICD_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "change_management".into(),
        category: "operations".into(),
        passed: has_cicd,
        severity: Severity::Low,
        detail: if has_cicd {
            "CI/CD component present".into()
        } else {
            "No CI/CD service detected".into()
        },
        recommendation: "Add CodePipeline (AWS), Cloud Build (GCP), or Azure DevOps for change management.".into(),
    });

    let passed = checks.iter().filter(|c| c.severity == Severity::High).all(|c| c.passed);
    let score = ValidationResult::score_from_checks(&checks);
    ValidationResult {
        framework: "SOC 2".into(),
        passed,
        score,
        checks,
    }
}
