use cloudwright_spec::{ArchSpec, Severity, ValidationCheck, ValidationResult};

use crate::helpers::{config_truthy, services, unencrypted_stores};
use crate::service_sets::{AUTH_SERVICES, COMPUTE_SERVICES, DATA_STORE_SERVICES, LB_SERVICES, LOGGING_SERVICES, WAF_SERVICES};

pub fn check(spec: &ArchSpec) -> ValidationResult {
    let svcs = services(spec);
    let mut checks = Vec::new();

    let has_multi_az = spec.components.iter().any(|c| config_truthy(c, "multi_az"));
    checks.push(ValidationCheck {
        name: "multi_az".into(),
        category: "reliability".into(),
        passed: has_multi_az,
        severity: Severity::High,
        detail: if has_multi_az {
            "Multi-AZ enabled on one or more components".into()
        } else {
            "No multi-AZ configuration found".into()
        },
        recommendation: "Enable multi_az=true on RDS, caches, and other stateful components.".into(),
    });

    let has_auto_scale = spec
        .components
        .iter()
        .any(|c| COMPUTE_SERVICES.contains(&c.service.as_str()) && config_truthy(c, "auto_scaling"));
    checks.push(ValidationCheck {
        name: "auto_scaling".into(),
        category: "reliability".into(),
        passed: has_auto_scale,
        severity: Severity::Medium,
        detail: if has_auto_scale {
            "Auto-scaling configured on compute".into()
        } else {
            "No auto-scaling on compute components".into()
        },
        recommendation: "Set auto_scaling=true on EC2/ECS/GKE/AKS components.".into(),
    });

    let has_backup = spec
        .components
        .iter()
        .any(|c| DATA_STORE_SERVICES.contains(&c.service.as_str()) && config_truthy(c, "backup"));
    checks.push(ValidationCheck {
        name: "backup".into(),
        category: "reliability".into(),
        passed: has_backup,
        severity: Severity::Medium,
        detail: if has_backup {
            "Backup configured on data stores".into()
        } else {
            "No backup configuration on data stores".into()
        },
        recommendation: "Enable automated backups on RDS, DynamoDB, Cloud SQL, and Cosmos DB.".into(),
    });

    let has_monitoring = svcs.iter().any(|s| LOGGING_SERVICES.contains(s));
    checks.push(ValidationCheck {
        name: "monitoring".into(),
        category: "operations".into(),
        passed: has_monitoring,
        severity: Severity::High,
        detail: if has_monitoring {
            "Monitoring/logging component present".into()
        } else {
            "No monitoring service detected".into()
        },
        recommendation: "Add CloudWatch, Cloud Logging, or Azure Monitor.".into(),
    });

    let has_lb = svcs.iter().any(|s| LB_SERVICES.contains(s));
    let has_replicated_db = spec.components.iter().any(|c| {
        DATA_STORE_SERVICES.contains(&c.service.as_str())
            && (config_truthy(c, "multi_az") || c.config_f64("replicas").unwrap_or(0.0) > 1.0)
    });
    let has_data_store = svcs.iter().any(|s| DATA_STORE_SERVICES.contains(s));
    let no_spof = has_lb && (has_replicated_db || !has_data_store);
    checks.push(ValidationCheck {
        name: "no_single_point_of_failure".into(),
        category: "reliability".into(),
        passed: no_spof,
        severity: Severity::High,
        detail: if no_spof {
            "Load balancer and replicated DB present".into()
        } else {
            "Single point of failure detected (no LB or unreplicated DB)".into()
        },
        recommendation: "Place a load balancer in front of compute and enable multi-AZ or read replicas on databases."
            .into(),
    });

    let oversized: Vec<&str> = spec
        .components
        .iter()
        .filter(|c| {
            let instance_type = c.config_str("instance_type").unwrap_or("");
            ["32xlarge", "24xlarge", "16xlarge"]
                .iter()
                .any(|tier| instance_type.contains(tier))
        })
        .map(|c| c.id.as_str())
        .collect();
    checks.push(ValidationCheck {
        name: "cost_optimization".into(),
        category: "cost".into(),
        passed: oversized.is_empty(),
        severity: Severity::Low,
        detail: if oversized.is_empty() {
            "No obviously oversized instances detected".into()
        } else {
            format!("Potentially oversized instances: {}", oversized.join(", "))
        },
        recommendation: "Right-size instances based on actual workload metrics. Use Savings Plans or Reserved Instances."
            .into(),
    });

    let has_waf = svcs.iter().any(|s| WAF_SERVICES.contains(s));
    let has_auth = svcs.iter().any(|s| AUTH_SERVICES.contains(s));
    let unencrypted = unencrypted_stores(spec);
    let security_ok = has_waf && has_auth && unencrypted.is_empty();
    checks.push(ValidationCheck {
        name: "security".into(),
        category: "security".into(),
        passed: security_ok,
        severity: Severity::High,
        detail: if security_ok {
            "WAF, auth, and encryption all present".into()
        } else {
            let mut missing = Vec::new();
            if !has_waf {
                missing.push("WAF".to_string());
            }
            if !has_auth {
                missing.push("auth/IAM".to_string());
            }
            if !unencrypted.is_empty() {
                missing.push(format!("encryption on {}", unencrypted.join(", ")));
            }
            format!("Missing: {}", missing.join(", "))
        },
        recommendation: "Add WAF, IAM/auth service, and enable encryption on all data stores.".into(),
    });

    let passed = checks.iter().filter(|c| c.severity == Severity::High).all(|c| c.passed);
    let score = ValidationResult::score_from_checks(&checks);
    ValidationResult {
        framework: "Well-Architected".into(),
        passed,
        score,
        checks,
    }
}
