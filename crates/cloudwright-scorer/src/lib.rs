//! Architecture quality scorer: rates an [`ArchSpec`] on five weighted
//! dimensions and rolls them up into a letter grade.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use cloudwright_spec::ArchSpec;
use cloudwright_validator::Validator;

const LB_SERVICES: &[&str] = &["alb", "nlb", "cloud_load_balancing", "app_gateway", "azure_lb"];
const DB_SERVICES: &[&str] = &["rds", "aurora", "cloud_sql", "azure_sql"];
const COMPUTE_SERVICES: &[&str] = &["ec2", "compute_engine", "virtual_machines", "ecs", "eks", "gke", "aks"];
const CDN_SERVICES: &[&str] = &["cloudfront", "cloud_cdn", "azure_cdn"];
const CACHE_SERVICES: &[&str] = &["elasticache", "memorystore", "azure_cache"];
const WAF_SERVICES: &[&str] = &["waf", "cloud_armor", "azure_waf"];
const AUTH_SERVICES: &[&str] = &["cognito", "firebase_auth", "azure_ad"];
const DATA_SERVICES: &[&str] = &[
    "rds", "aurora", "cloud_sql", "azure_sql", "dynamodb", "firestore", "cosmos_db", "s3", "cloud_storage",
    "blob_storage",
];
const DNS_SERVICES: &[&str] = &["route53", "cloud_dns", "azure_dns"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall: f64,
    pub dimensions: Vec<DimensionScore>,
    pub grade: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Scorer;

impl Scorer {
    pub fn new() -> Self {
        Scorer
    }

    pub fn score(&self, spec: &ArchSpec) -> ScoreResult {
        let dimensions = vec![
            score_reliability(spec),
            score_security(spec),
            score_cost_efficiency(spec),
            score_compliance(spec),
            score_complexity(spec),
        ];

        let overall: f64 = dimensions.iter().map(|d| d.score * d.weight).sum();
        let grade = grade_for(overall);

        let mut by_score: Vec<&DimensionScore> = dimensions.iter().collect();
        by_score.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap());
        let mut recommendations: Vec<String> = Vec::new();
        for d in by_score {
            recommendations.extend(d.recommendations.iter().take(2).cloned());
        }
        recommendations.truncate(5);

        ScoreResult {
            overall,
            dimensions,
            grade,
            recommendations,
        }
    }
}

fn services(spec: &ArchSpec) -> HashSet<&str> {
    spec.components.iter().map(|c| c.service.as_str()).collect()
}

fn score_reliability(spec: &ArchSpec) -> DimensionScore {
    let mut details = Vec::new();
    let mut recs = Vec::new();
    let mut checks = 0.0_f64;
    let mut passed = 0.0_f64;
    let svcs = services(spec);

    checks += 1.0;
    if svcs.iter().any(|s| LB_SERVICES.contains(s)) {
        passed += 1.0;
        details.push("Load balancer present".to_string());
    } else {
        recs.push("Add a load balancer for high availability".to_string());
    }

    checks += 1.0;
    let db_components: Vec<_> = spec.components.iter().filter(|c| DB_SERVICES.contains(&c.service.as_str())).collect();
    if db_components.is_empty() {
        passed += 1.0;
    } else if db_components.iter().any(|c| c.config_bool("multi_az") == Some(true)) {
        passed += 1.0;
        details.push("Database Multi-AZ enabled".to_string());
    } else {
        recs.push("Enable Multi-AZ for database redundancy".to_string());
    }

    checks += 1.0;
    let compute_components: Vec<_> =
        spec.components.iter().filter(|c| COMPUTE_SERVICES.contains(&c.service.as_str())).collect();
    if compute_components.is_empty() {
        passed += 1.0;
    } else if compute_components.iter().any(|c| {
        c.config_f64("count").unwrap_or(1.0) > 1.0
            || c.config_bool("auto_scaling") == Some(true)
            || c.config_f64("min_count").unwrap_or(0.0) > 1.0
    }) {
        passed += 1.0;
        details.push("Compute redundancy/scaling configured".to_string());
    } else {
        recs.push("Configure auto-scaling or multiple instances for compute".to_string());
    }

    checks += 1.0;
    if svcs.iter().any(|s| CDN_SERVICES.contains(s)) {
        passed += 1.0;
        details.push("CDN configured for edge caching".to_string());
    } else {
        recs.push("Add a CDN for improved availability and latency".to_string());
    }

    checks += 1.0;
    if svcs.iter().any(|s| CACHE_SERVICES.contains(s)) {
        passed += 1.0;
        details.push("Cache layer present".to_string());
    } else {
        recs.push("Add a cache layer to reduce database load".to_string());
    }

    let score = if checks > 0.0 { passed / checks * 100.0 } else { 50.0 };
    DimensionScore {
        name: "Reliability".into(),
        score,
        weight: 0.30,
        details,
        recommendations: recs,
    }
}

fn score_security(spec: &ArchSpec) -> DimensionScore {
    let mut details = Vec::new();
    let mut recs = Vec::new();
    let mut checks = 0.0_f64;
    let mut passed = 0.0_f64;
    let svcs = services(spec);

    checks += 1.0;
    if svcs.iter().any(|s| WAF_SERVICES.contains(s)) {
        passed += 1.0;
        details.push("WAF protection enabled".to_string());
    } else {
        recs.push("Add a WAF for web application protection".to_string());
    }

    checks += 1.0;
    if svcs.iter().any(|s| AUTH_SERVICES.contains(s)) {
        passed += 1.0;
        details.push("Authentication service present".to_string());
    } else {
        recs.push("Add an authentication service".to_string());
    }

    checks += 1.0;
    let data_comps: Vec<_> = spec.components.iter().filter(|c| DATA_SERVICES.contains(&c.service.as_str())).collect();
    if data_comps.is_empty() {
        passed += 1.0;
    } else {
        let encrypted = data_comps.iter().filter(|c| c.config_bool("encryption") == Some(true)).count();
        if encrypted == data_comps.len() {
            passed += 1.0;
            details.push("All data stores encrypted".to_string());
        } else if encrypted > 0 {
            passed += 0.5;
            details.push(format!("{encrypted}/{} data stores encrypted", data_comps.len()));
            recs.push("Enable encryption on all data stores".to_string());
        } else {
            recs.push("Enable encryption at rest on data stores".to_string());
        }
    }

    checks += 1.0;
    let https_conns = spec
        .connections
        .iter()
        .filter(|c| c.protocol.as_deref().map(|p| p.eq_ignore_ascii_case("https")).unwrap_or(false))
        .count();
    if spec.connections.is_empty() {
        passed += 1.0;
    } else if https_conns > 0 {
        let ratio = https_conns as f64 / spec.connections.len() as f64;
        passed += ratio;
        if ratio >= 1.0 {
            details.push("All connections use HTTPS".to_string());
        } else {
            details.push(format!("{https_conns}/{} connections use HTTPS", spec.connections.len()));
            recs.push("Use HTTPS for all connections".to_string());
        }
    } else {
        recs.push("Configure HTTPS protocol on connections".to_string());
    }

    checks += 1.0;
    if svcs.iter().any(|s| DNS_SERVICES.contains(s)) {
        passed += 1.0;
        details.push("DNS management configured".to_string());
    } else {
        passed += 0.5;
    }

    let score = if checks > 0.0 { passed / checks * 100.0 } else { 50.0 };
    DimensionScore {
        name: "Security".into(),
        score,
        weight: 0.25,
        details,
        recommendations: recs,
    }
}

fn score_cost_efficiency(spec: &ArchSpec) -> DimensionScore {
    let mut details = Vec::new();
    let mut recs = Vec::new();
    let mut score = 60.0_f64;

    match &spec.cost_estimate {
        Some(estimate) if !estimate.breakdown.is_empty() => {
            let total = estimate.monthly_total;
            let n_comps = spec.components.len();
            let avg = if n_comps > 0 { total / n_comps as f64 } else { 0.0 };
            details.push(format!("${total:.2}/mo across {n_comps} components (avg ${avg:.2}/component)"));

            for item in &estimate.breakdown {
                if total > 0.0 && item.monthly / total > 0.4 {
                    recs.push(format!(
                        "{} is {:.0}% of total cost — consider optimization",
                        item.component_id,
                        item.monthly / total * 100.0
                    ));
                    score -= 10.0;
                }
            }

            if let Some(constraints) = &spec.constraints {
                if let Some(budget) = constraints.budget_monthly {
                    if total <= budget {
                        score += 20.0;
                        details.push(format!("Under budget (${total:.2} / ${budget:.2})"));
                    } else {
                        score -= 20.0;
                        recs.push(format!("Over budget by ${:.2}", total - budget));
                    }
                }
            }

            let free_count = estimate.breakdown.iter().filter(|item| item.monthly == 0.0).count();
            if free_count > 0 {
                score += (free_count as f64 * 5.0).min(15.0);
                details.push(format!("{free_count} component(s) using free tier"));
            }
        }
        _ => {
            details.push("No cost estimate available — run cost analysis first".to_string());
            recs.push("Run the cost engine to get a cost breakdown".to_string());
        }
    }

    score = score.clamp(0.0, 100.0);
    DimensionScore {
        name: "Cost Efficiency".into(),
        score,
        weight: 0.20,
        details,
        recommendations: recs,
    }
}

fn score_compliance(spec: &ArchSpec) -> DimensionScore {
    let mut details = Vec::new();
    let mut recs = Vec::new();
    let mut score = 50.0_f64;

    match spec.constraints.as_ref().filter(|c| !c.compliance.is_empty()) {
        Some(constraints) => {
            let results = Validator::new().validate(spec, &constraints.compliance, false);
            if !results.is_empty() {
                let avg = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;
                score = avg * 100.0;
                for r in &results {
                    let status = if r.passed { "passed" } else { "failed" };
                    details.push(format!("{}: {status} ({:.0}%)", r.framework, r.score * 100.0));
                    if !r.passed {
                        for fc in r.checks.iter().filter(|c| !c.passed).take(2) {
                            recs.push(if !fc.recommendation.is_empty() {
                                format!("[{}] {}", r.framework, fc.recommendation)
                            } else {
                                format!("[{}] Fix: {}", r.framework, fc.name)
                            });
                        }
                    }
                }
            }
        }
        None => {
            details.push("No compliance requirements specified".to_string());
            score = 70.0;
        }
    }

    DimensionScore {
        name: "Compliance".into(),
        score,
        weight: 0.15,
        details,
        recommendations: recs,
    }
}

fn score_complexity(spec: &ArchSpec) -> DimensionScore {
    let n_components = spec.components.len();
    let n_connections = spec.connections.len();

    if n_components == 0 {
        return DimensionScore {
            name: "Complexity".into(),
            score: 50.0,
            weight: 0.10,
            details: vec!["No components".to_string()],
            recommendations: vec!["Add components".to_string()],
        };
    }

    let providers: HashSet<_> = spec.components.iter().map(|c| c.provider).collect();
    let service_set: HashSet<&str> = spec.components.iter().map(|c| c.service.as_str()).collect();

    let mut details = Vec::new();
    let mut recs = Vec::new();

    let density = n_connections as f64 / n_components as f64;
    details.push(format!("{n_components} components, {n_connections} connections (density: {density:.1})"));
    details.push(format!("{} provider(s), {} unique services", providers.len(), service_set.len()));

    let mut score = 80.0_f64;

    if n_components > 15 {
        score -= 20.0;
        recs.push("Consider splitting into separate microservices or modules".to_string());
    } else if n_components > 10 {
        score -= 10.0;
        recs.push("Architecture is moderately complex — ensure each component is necessary".to_string());
    } else if n_components < 3 {
        score -= 10.0;
        recs.push("Architecture may be too simple for production use".to_string());
    }

    if density > 3.0 {
        score -= 15.0;
        recs.push("High connection density — consider introducing a message bus to decouple".to_string());
    } else if density < 0.5 && n_components > 2 {
        score -= 10.0;
        recs.push("Low connection density — some components may be disconnected".to_string());
    }

    if providers.len() > 2 {
        score -= 10.0;
        details.push("Multi-cloud adds operational complexity".to_string());
    }

    let tiers: HashSet<i64> = spec.components.iter().map(|c| c.tier).collect();
    if tiers.len() >= 3 {
        score += 10.0;
        details.push("Good tier separation".to_string());
    }

    score = score.clamp(0.0, 100.0);
    DimensionScore {
        name: "Complexity".into(),
        score,
        weight: 0.10,
        details,
        recommendations: recs,
    }
}

fn grade_for(score: f64) -> String {
    if score >= 90.0 {
        "A".to_string()
    } else if score >= 80.0 {
        "B".to_string()
    } else if score >= 70.0 {
        "C".to_string()
    } else if score >= 60.0 {
        "D".to_string()
    } else {
        "F".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::{Component, Provider, Value};

    fn bare_spec() -> ArchSpec {
        ArchSpec::new("demo", Provider::Aws, "us-east-1")
    }

    #[test]
    fn empty_spec_gets_complexity_floor() {
        let result = Scorer::new().score(&bare_spec());
        let complexity = result.dimensions.iter().find(|d| d.name == "Complexity").unwrap();
        assert_eq!(complexity.score, 50.0);
    }

    #[test]
    fn weights_sum_to_one() {
        let result = Scorer::new().score(&bare_spec());
        let total_weight: f64 = result.dimensions.iter().map(|d| d.weight).sum();
        assert!((total_weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grade_follows_overall_thresholds() {
        assert_eq!(grade_for(95.0), "A");
        assert_eq!(grade_for(85.0), "B");
        assert_eq!(grade_for(75.0), "C");
        assert_eq!(grade_for(65.0), "D");
        assert_eq!(grade_for(10.0), "F");
    }

    #[test]
    fn no_compliance_constraints_gives_neutral_score() {
        let spec = bare_spec();
        let result = Scorer::new().score(&spec);
        let compliance = result.dimensions.iter().find(|d| d.name == "Compliance").unwrap();
        assert_eq!(compliance.score, 70.0);
    }

    #[test]
    fn encrypted_data_store_improves_security_dimension() {
        let mut spec = bare_spec();
        spec.components.push(Component {
            id: "db".into(),
            service: "rds".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 3,
            config: [("encryption".to_string(), Value::Bool(true))].into_iter().collect(),
        });
        let with_encryption = Scorer::new().score(&spec);

        spec.components[0].config.remove("encryption");
        let without_encryption = Scorer::new().score(&spec);

        let sec_with = with_encryption.dimensions.iter().find(|d| d.name == "Security").unwrap().score;
        let sec_without = without_encryption.dimensions.iter().find(|d| d.name == "Security").unwrap().score;
        assert!(sec_with > sec_without);
    }
}
