//! Architecture anti-pattern linter: cheap heuristic checks feeding the
//! Scorer's reliability/cost-efficiency dimensions. Unlike the framework
//! checks, these match on substrings of the service key rather than exact
//! enumerated sets, since the same warning should fire for any provider's
//! "looks like a database" service without a matching entry in every
//! service-class constant.

use serde::{Deserialize, Serialize};

use cloudwright_spec::ArchSpec;

use crate::helpers::config_truthy;

const DATA_STORE_KEYWORDS: &[&str] =
    &["rds", "dynamodb", "s3", "elasticache", "redshift", "aurora", "cosmos", "cloud_sql", "storage"];
const COMPUTE_KEYWORDS: &[&str] = &["ec2", "ecs", "eks", "compute", "vm", "app_service", "cloud_run"];
const LB_KEYWORDS: &[&str] = &["alb", "nlb", "load_balancer", "elb", "app_gateway"];
const DB_KEYWORDS: &[&str] = &["rds", "dynamodb", "elasticache", "redshift", "aurora", "cosmos", "cloud_sql"];
const MONITORING_KEYWORDS: &[&str] =
    &["monitoring", "cloudwatch", "logging", "stackdriver", "azure_monitor", "datadog", "newrelic"];
const WAF_KEYWORDS: &[&str] = &["waf", "shield"];
const AUTH_KEYWORDS: &[&str] = &["cognito", "auth", "iam", "azure_ad", "identity", "okta"];
const API_GATEWAY_KEYWORDS: &[&str] = &["api_gateway", "apigw", "api-gateway"];
const OVERSIZED_KEYWORDS: &[&str] = &["16xlarge", "24xlarge", "metal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintWarning {
    pub rule: String,
    pub severity: LintSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub message: String,
    pub recommendation: String,
}

fn matches_any(service: &str, keywords: &[&str]) -> bool {
    let s = service.to_ascii_lowercase();
    keywords.iter().any(|k| s.contains(k))
}

fn is_data_store(service: &str) -> bool {
    matches_any(service, DATA_STORE_KEYWORDS)
}

fn is_db(service: &str) -> bool {
    matches_any(service, DB_KEYWORDS)
}

fn is_compute(service: &str) -> bool {
    matches_any(service, COMPUTE_KEYWORDS)
}

fn is_lb(service: &str) -> bool {
    matches_any(service, LB_KEYWORDS)
}

fn is_waf(service: &str) -> bool {
    matches_any(service, WAF_KEYWORDS)
}

fn is_monitoring(service: &str) -> bool {
    matches_any(service, MONITORING_KEYWORDS)
}

fn is_auth(service: &str) -> bool {
    matches_any(service, AUTH_KEYWORDS)
}

fn is_api_gateway_or_lb(service: &str) -> bool {
    is_lb(service) || matches_any(service, API_GATEWAY_KEYWORDS)
}

pub fn lint(spec: &ArchSpec) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    warnings.extend(check_no_encryption(spec));
    warnings.extend(check_single_az(spec));
    warnings.extend(check_oversized_instances(spec));
    warnings.extend(check_no_load_balancer(spec));
    warnings.extend(check_public_database(spec));
    warnings.extend(check_no_waf(spec));
    warnings.extend(check_no_monitoring(spec));
    warnings.extend(check_single_point_of_failure(spec));
    warnings.extend(check_no_backup(spec));
    warnings.extend(check_no_auth(spec));
    warnings
}

fn check_no_encryption(spec: &ArchSpec) -> Vec<LintWarning> {
    spec.components
        .iter()
        .filter(|c| is_data_store(&c.service) && !config_truthy(c, "encryption"))
        .map(|c| LintWarning {
            rule: "no_encryption".into(),
            severity: LintSeverity::Error,
            component: Some(c.id.clone()),
            message: format!("{} ({}) has no encryption configured", c.display_label(), c.service),
            recommendation: "Set encryption: true in the component config".into(),
        })
        .collect()
}

fn check_single_az(spec: &ArchSpec) -> Vec<LintWarning> {
    if spec.components.len() < 3 {
        return Vec::new();
    }
    spec.components
        .iter()
        .filter(|c| is_db(&c.service) && !config_truthy(c, "multi_az"))
        .map(|c| LintWarning {
            rule: "single_az".into(),
            severity: LintSeverity::Error,
            component: Some(c.id.clone()),
            message: format!("{} ({}) is not configured for multi-AZ", c.display_label(), c.service),
            recommendation: "Enable multi_az: true to prevent a single availability zone failure from causing downtime"
                .into(),
        })
        .collect()
}

fn check_oversized_instances(spec: &ArchSpec) -> Vec<LintWarning> {
    spec.components
        .iter()
        .filter_map(|c| {
            let instance_type = c
                .config_str("instance_type")
                .or_else(|| c.config_str("instance_class"))
                .unwrap_or("");
            let lower = instance_type.to_ascii_lowercase();
            if OVERSIZED_KEYWORDS.iter().any(|k| lower.contains(k)) {
                Some(LintWarning {
                    rule: "oversized_instances".into(),
                    severity: LintSeverity::Warning,
                    component: Some(c.id.clone()),
                    message: format!("{} uses oversized instance type '{instance_type}'", c.display_label()),
                    recommendation: "Validate that this instance size is justified by workload requirements; consider right-sizing".into(),
                })
            } else {
                None
            }
        })
        .collect()
}

fn check_no_load_balancer(spec: &ArchSpec) -> Vec<LintWarning> {
    let compute_count = spec.components.iter().filter(|c| is_compute(&c.service)).count();
    if compute_count < 2 {
        return Vec::new();
    }
    if spec.components.iter().any(|c| is_lb(&c.service)) {
        return Vec::new();
    }
    vec![LintWarning {
        rule: "no_load_balancer".into(),
        severity: LintSeverity::Error,
        component: None,
        message: format!("Architecture has {compute_count} compute components but no load balancer"),
        recommendation: "Add a load balancer (ALB/NLB) to distribute traffic across compute instances".into(),
    }]
}

fn check_public_database(spec: &ArchSpec) -> Vec<LintWarning> {
    spec.components
        .iter()
        .filter(|c| is_db(&c.service) && config_truthy(c, "publicly_accessible"))
        .map(|c| LintWarning {
            rule: "public_database".into(),
            severity: LintSeverity::Error,
            component: Some(c.id.clone()),
            message: format!("{} ({}) is publicly accessible", c.display_label(), c.service),
            recommendation: "Set publicly_accessible: false and restrict access via VPC security groups".into(),
        })
        .collect()
}

fn check_no_waf(spec: &ArchSpec) -> Vec<LintWarning> {
    let has_ingress = spec.components.iter().any(|c| is_api_gateway_or_lb(&c.service));
    if !has_ingress {
        return Vec::new();
    }
    if spec.components.iter().any(|c| is_waf(&c.service)) {
        return Vec::new();
    }
    vec![LintWarning {
        rule: "no_waf".into(),
        severity: LintSeverity::Warning,
        component: None,
        message: "Load balancer or API gateway present but no WAF/Shield configured".into(),
        recommendation: "Add a WAF to protect against common web exploits and DDoS attacks".into(),
    }]
}

fn check_no_monitoring(spec: &ArchSpec) -> Vec<LintWarning> {
    if spec.components.len() < 3 {
        return Vec::new();
    }
    if spec.components.iter().any(|c| is_monitoring(&c.service)) {
        return Vec::new();
    }
    vec![LintWarning {
        rule: "no_monitoring".into(),
        severity: LintSeverity::Warning,
        component: None,
        message: format!("Architecture has {} components but no monitoring or logging service", spec.components.len()),
        recommendation: "Add a monitoring service (CloudWatch, Datadog, etc.) to observe system health".into(),
    }]
}

fn check_single_point_of_failure(spec: &ArchSpec) -> Vec<LintWarning> {
    let compute: Vec<_> = spec.components.iter().filter(|c| is_compute(&c.service)).collect();
    if compute.len() != 1 {
        return Vec::new();
    }
    let c = compute[0];
    if config_truthy(c, "auto_scaling") {
        return Vec::new();
    }
    vec![LintWarning {
        rule: "single_point_of_failure".into(),
        severity: LintSeverity::Error,
        component: Some(c.id.clone()),
        message: format!("{} is the sole compute component with no auto-scaling configured", c.display_label()),
        recommendation: "Enable auto_scaling or add a second compute component behind a load balancer".into(),
    }]
}

fn check_no_backup(spec: &ArchSpec) -> Vec<LintWarning> {
    spec.components
        .iter()
        .filter(|c| is_db(&c.service) && !(config_truthy(c, "backup") || config_truthy(c, "point_in_time_recovery")))
        .map(|c| LintWarning {
            rule: "no_backup".into(),
            severity: LintSeverity::Warning,
            component: Some(c.id.clone()),
            message: format!("{} ({}) has no backup or point-in-time recovery configured", c.display_label(), c.service),
            recommendation: "Enable backup: true or point_in_time_recovery: true to protect against data loss".into(),
        })
        .collect()
}

fn check_no_auth(spec: &ArchSpec) -> Vec<LintWarning> {
    let has_ingress = spec.components.iter().any(|c| is_api_gateway_or_lb(&c.service));
    if !has_ingress {
        return Vec::new();
    }
    if spec.components.iter().any(|c| is_auth(&c.service)) {
        return Vec::new();
    }
    vec![LintWarning {
        rule: "no_auth".into(),
        severity: LintSeverity::Warning,
        component: None,
        message: "API gateway or load balancer present but no authentication service configured".into(),
        recommendation: "Add an auth service (Cognito, Azure AD, IAM) to secure public-facing endpoints".into(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::{Component, Provider, Value};

    fn component(id: &str, service: &str) -> Component {
        Component {
            id: id.into(),
            service: service.into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: Default::default(),
        }
    }

    #[test]
    fn single_point_of_failure_fires_for_lone_compute_without_autoscaling() {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(component("web", "ec2"));
        let warnings = lint(&spec);
        assert!(warnings.iter().any(|w| w.rule == "single_point_of_failure"));
    }

    #[test]
    fn single_point_of_failure_silent_with_autoscaling() {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        let mut web = component("web", "ec2");
        web.config.insert("auto_scaling".into(), Value::Bool(true));
        spec.components.push(web);
        let warnings = lint(&spec);
        assert!(!warnings.iter().any(|w| w.rule == "single_point_of_failure"));
    }

    #[test]
    fn oversized_instance_detected_by_substring() {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        let mut web = component("web", "ec2");
        web.config.insert("instance_type".into(), Value::String("m5.16xlarge".into()));
        spec.components.push(web);
        let warnings = lint(&spec);
        assert!(warnings.iter().any(|w| w.rule == "oversized_instances"));
    }

    #[test]
    fn no_encryption_flags_unencrypted_data_store() {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(component("db", "rds"));
        let warnings = lint(&spec);
        assert!(warnings.iter().any(|w| w.rule == "no_encryption"));
    }

    #[test]
    fn no_load_balancer_needs_at_least_two_compute_components() {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(component("web1", "ec2"));
        let warnings = lint(&spec);
        assert!(!warnings.iter().any(|w| w.rule == "no_load_balancer"));

        spec.components.push(component("web2", "ec2"));
        let warnings = lint(&spec);
        assert!(warnings.iter().any(|w| w.rule == "no_load_balancer"));
    }
}
