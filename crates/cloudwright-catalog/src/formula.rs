//! Named pricing formulas used when the catalog has no specific price for a
//! service (Tier 2) and the static fallback table used when even a formula
//! has nothing to key off of (Tier 3). No `eval` — formulas are plain Rust
//! functions dispatched by name.

use cloudwright_spec::ConfigMap;

fn cfg_f64(config: &ConfigMap, keys: &[&str], default: f64) -> f64 {
    keys.iter()
        .find_map(|k| config.get(*k).and_then(|v| v.as_f64()))
        .unwrap_or(default)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Hourly rate * 730 hours/month * count. `None` when no rate is available.
pub fn per_hour(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let rate = if base_rate > 0.0 {
        base_rate
    } else {
        cfg_f64(config, &["price_per_hour"], 0.0)
    };
    if rate <= 0.0 {
        return None;
    }
    let count = cfg_f64(config, &["count"], 1.0);
    Some(round2(rate * 730.0 * count))
}

/// Request-based pricing (Lambda, API Gateway, etc.).
pub fn per_request(config: &ConfigMap, _base_rate: f64) -> Option<f64> {
    let monthly_requests = cfg_f64(config, &["monthly_requests"], 1_000_000.0);
    let avg_duration_ms = cfg_f64(config, &["avg_duration_ms"], 200.0);
    let memory_mb = cfg_f64(config, &["memory_mb"], 512.0);
    let request_cost = (monthly_requests / 1_000_000.0) * 0.20;
    let gb_seconds = (monthly_requests * avg_duration_ms / 1000.0) * (memory_mb / 1024.0);
    let compute_cost = gb_seconds * 0.0000166667;
    Some(round2(request_cost + compute_cost))
}

/// Per-GB storage pricing.
pub fn per_gb(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let storage_gb = cfg_f64(config, &["storage_gb", "estimated_gb"], 50.0);
    let rate = if base_rate > 0.0 { base_rate } else { 0.023 };
    Some(round2(storage_gb * rate))
}

/// Per-GB-hour pricing (cache services).
pub fn per_gb_hour(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let memory_gb = cfg_f64(config, &["memory_gb"], 4.0);
    let rate = if base_rate > 0.0 { base_rate } else { 0.049 };
    Some(round2(memory_gb * rate * 730.0))
}

/// DNS zone-based pricing.
pub fn per_zone(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let zones = cfg_f64(config, &["hosted_zones"], 1.0);
    let queries = cfg_f64(config, &["monthly_queries"], 1_000_000.0);
    let rate = if base_rate > 0.0 { base_rate } else { 0.50 };
    let zone_cost = zones * rate;
    let query_cost = (queries / 1_000_000.0) * 0.40;
    Some(round2(zone_cost + query_cost))
}

/// Fixed monthly + per-request (WAF, etc.).
pub fn fixed_plus_request(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let rules = cfg_f64(config, &["rules", "policies"], 1.0);
    let monthly_requests = cfg_f64(config, &["monthly_requests"], 10_000_000.0);
    let rate = if base_rate > 0.0 { base_rate } else { 5.0 };
    let fixed = rules * rate;
    let request_cost = (monthly_requests / 1_000_000.0) * 0.60;
    Some(round2(fixed + request_cost))
}

/// Monthly active user pricing (auth services). Usually free tier.
pub fn per_mau(config: &ConfigMap, _base_rate: f64) -> Option<f64> {
    let mau = cfg_f64(config, &["monthly_active_users"], 10_000.0);
    if mau <= 50_000.0 {
        return Some(0.0);
    }
    Some(round2((mau - 50_000.0) * 0.0055))
}

/// Shard/throughput-based pricing (Kinesis, Event Hubs).
pub fn per_shard_hour(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let shards = cfg_f64(config, &["shards", "throughput_units"], 2.0);
    let rate = if base_rate > 0.0 { base_rate } else { 0.015 };
    Some(round2(shards * rate * 730.0))
}

/// Per-TB query pricing (BigQuery-style).
pub fn per_tb_query(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let monthly_tb = cfg_f64(config, &["monthly_query_tb"], 1.0);
    let storage_gb = cfg_f64(config, &["storage_gb"], 100.0);
    let rate = if base_rate > 0.0 { base_rate } else { 5.0 };
    let query_cost = monthly_tb * rate;
    let storage_cost = storage_gb * 0.02;
    Some(round2(query_cost + storage_cost))
}

/// Per-node-hour pricing (Redshift, Spanner).
pub fn per_node_hour(config: &ConfigMap, base_rate: f64) -> Option<f64> {
    let nodes = cfg_f64(config, &["num_nodes", "node_count"], 1.0);
    let rate = if base_rate > 0.0 {
        base_rate
    } else {
        cfg_f64(config, &["price_per_hour"], 0.25)
    };
    let storage_gb = cfg_f64(config, &["storage_gb"], 100.0);
    let compute = round2(nodes * rate * 730.0);
    let storage = round2(storage_gb * 0.024);
    Some(compute + storage)
}

/// Looks up a named formula by the name stored on a service's registry
/// entry. Unknown names fall back to `per_hour`, mirroring the registry's
/// own `get_pricing_formula` default.
pub fn dispatch(name: &str, config: &ConfigMap, base_rate: f64) -> Option<f64> {
    match name {
        "per_hour" => per_hour(config, base_rate),
        "per_request" => per_request(config, base_rate),
        "per_gb" => per_gb(config, base_rate),
        "per_gb_hour" => per_gb_hour(config, base_rate),
        "per_zone" => per_zone(config, base_rate),
        "fixed_plus_request" => fixed_plus_request(config, base_rate),
        "per_mau" => per_mau(config, base_rate),
        "per_shard_hour" => per_shard_hour(config, base_rate),
        "per_tb_query" => per_tb_query(config, base_rate),
        "per_node_hour" => per_node_hour(config, base_rate),
        _ => per_hour(config, base_rate),
    }
}

/// Static monthly price, in USD, keyed by service name. Used only when
/// neither the catalog nor a pricing formula can resolve a rate.
const FALLBACK_PRICES: &[(&str, f64)] = &[
    ("ec2", 150.0),
    ("compute_engine", 150.0),
    ("virtual_machines", 150.0),
    ("ecs", 400.0),
    ("eks", 400.0),
    ("gke", 400.0),
    ("aks", 400.0),
    ("fargate", 120.0),
    ("cloud_run", 50.0),
    ("container_apps", 50.0),
    ("app_engine", 60.0),
    ("app_service", 55.0),
    ("rds", 200.0),
    ("aurora", 250.0),
    ("cloud_sql", 180.0),
    ("azure_sql", 180.0),
    ("elasticache", 180.0),
    ("memorystore", 180.0),
    ("azure_cache", 180.0),
    ("dynamodb", 75.0),
    ("cosmos_db", 100.0),
    ("firestore", 40.0),
    ("spanner", 200.0),
    ("s3", 10.0),
    ("cloud_storage", 10.0),
    ("blob_storage", 10.0),
    ("cloudfront", 85.0),
    ("cloud_cdn", 85.0),
    ("azure_cdn", 85.0),
    ("alb", 25.0),
    ("nlb", 25.0),
    ("app_gateway", 25.0),
    ("azure_lb", 20.0),
    ("cloud_load_balancing", 20.0),
    ("sqs", 10.0),
    ("pub_sub", 10.0),
    ("service_bus", 15.0),
    ("sns", 5.0),
    ("event_hubs", 15.0),
    ("kinesis", 50.0),
    ("msk", 250.0),
    ("confluent_kafka", 250.0),
    ("redshift", 500.0),
    ("bigquery", 25.0),
    ("synapse", 500.0),
    ("sagemaker", 200.0),
    ("vertex_ai", 200.0),
    ("azure_ml", 200.0),
    ("lambda", 15.0),
    ("cloud_functions", 15.0),
    ("azure_functions", 15.0),
    ("waf", 15.0),
    ("cloud_armor", 15.0),
    ("azure_waf", 15.0),
    ("api_gateway", 15.0),
    ("api_management", 15.0),
    ("nat_gateway", 35.0),
    ("cloud_nat", 35.0),
    ("users", 0.0),
    ("internet", 0.0),
    ("external", 0.0),
    ("client", 0.0),
    ("browser", 0.0),
    ("mobile", 0.0),
    ("vpc", 0.0),
    ("vnet", 0.0),
    ("iam", 0.0),
    ("route53", 1.0),
    ("cloud_dns", 1.0),
    ("azure_dns", 1.0),
    ("cognito", 0.0),
    ("firebase_auth", 0.0),
    ("azure_ad", 0.0),
    ("cloudwatch", 5.0),
    ("cloud_logging", 3.0),
    ("cloud_monitoring", 5.0),
    ("azure_monitor", 5.0),
    ("kms", 1.0),
    ("cloud_kms", 1.0),
    ("key_vault", 1.0),
    ("secrets_manager", 1.0),
    ("secret_manager", 1.0),
    ("ecr", 2.0),
    ("gcr", 0.0),
    ("acr", 5.0),
    ("artifact_registry", 0.0),
    ("codecommit", 0.0),
    ("codebuild", 3.0),
    ("codepipeline", 3.0),
    ("cloud_build", 0.0),
    ("shield", 0.0),
    ("guardduty", 5.0),
    ("security_hub", 0.0),
    ("config", 3.0),
    ("cloudtrail", 3.0),
    ("audit_log", 0.0),
    ("step_functions", 5.0),
    ("workflows", 3.0),
    ("logic_apps", 5.0),
    ("eventbridge", 2.0),
    ("event_grid", 3.0),
    ("dataflow", 25.0),
    ("elasticbeanstalk", 0.0),
    ("elastic_beanstalk", 0.0),
    ("amplify", 0.0),
    ("ses", 1.0),
    ("sendgrid", 0.0),
    ("terraform_cloud", 0.0),
];

/// Fallback pricing when the catalog has no specific data for a service.
pub fn default_managed_price(service: &str, config: &ConfigMap) -> f64 {
    let mut base = FALLBACK_PRICES
        .iter()
        .find(|(name, _)| *name == service)
        .map(|(_, price)| *price)
        .unwrap_or(10.0);

    let count = cfg_f64(
        config,
        &["count", "instance_count", "desired_count", "min_tasks", "min_instances"],
        1.0,
    );
    if count > 1.0 {
        base *= count;
    }

    let storage_gb = cfg_f64(config, &["storage_gb"], 0.0);
    if storage_gb > 0.0 {
        base += storage_gb * 0.10;
    }

    let node_count = cfg_f64(config, &["node_count", "num_nodes"], 0.0);
    if node_count > 1.0 {
        base *= node_count;
    }

    round2(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::Value;

    fn cfg(pairs: &[(&str, Value)]) -> ConfigMap {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn per_hour_returns_none_without_rate() {
        assert_eq!(per_hour(&ConfigMap::new(), 0.0), None);
    }

    #[test]
    fn per_hour_multiplies_count() {
        let config = cfg(&[("count", Value::Number(2.0))]);
        assert_eq!(per_hour(&config, 0.10), Some(146.0));
    }

    #[test]
    fn per_mau_is_free_under_threshold() {
        let config = cfg(&[("monthly_active_users", Value::Number(10_000.0))]);
        assert_eq!(per_mau(&config, 0.0), Some(0.0));
    }

    #[test]
    fn default_managed_price_scales_with_count() {
        let config = cfg(&[("count", Value::Number(3.0))]);
        assert_eq!(default_managed_price("ec2", &config), 450.0);
    }

    #[test]
    fn default_managed_price_unknown_service_uses_base_fallback() {
        assert_eq!(default_managed_price("totally_unknown", &ConfigMap::new()), 10.0);
    }
}
