//! End-to-end scenarios from spec.md §8, exercised through the
//! `Cloudwright` facade rather than any one crate in isolation.

use std::collections::BTreeMap;

use cloudwright_catalog::Catalog;
use cloudwright_core::Cloudwright;
use cloudwright_registry::ServiceRegistry;
use cloudwright_spec::{ArchSpec, Component, Connection, Provider, Value};

fn temp_cloudwright() -> (Cloudwright, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = Catalog::open(dir.path().join("catalog.sqlite")).expect("open catalog");
    let registry = ServiceRegistry::load_embedded().expect("load registry");
    (Cloudwright::from_parts(catalog, registry), dir)
}

fn config(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn three_tier_aws_spec() -> ArchSpec {
    let mut spec = ArchSpec::new("three-tier", Provider::Aws, "us-east-1");
    spec.components.push(Component {
        id: "cdn".into(),
        service: "cloudfront".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 0,
        config: BTreeMap::new(),
    });
    spec.components.push(Component {
        id: "alb".into(),
        service: "alb".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 1,
        config: BTreeMap::new(),
    });
    spec.components.push(Component {
        id: "web".into(),
        service: "ec2".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 2,
        config: config(&[
            ("instance_type", Value::String("m5.large".into())),
            ("count", Value::Number(2.0)),
        ]),
    });
    spec.components.push(Component {
        id: "db".into(),
        service: "rds".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 3,
        config: config(&[
            ("instance_class", Value::String("db.r5.large".into())),
            ("engine", Value::String("postgres".into())),
            ("multi_az", Value::Bool(true)),
            ("storage_gb", Value::Number(100.0)),
        ]),
    });
    spec.connections.push(Connection {
        source: "cdn".into(),
        target: "alb".into(),
        label: String::new(),
        protocol: Some("HTTPS".into()),
        port: None,
        estimated_monthly_gb: None,
    });
    spec.connections.push(Connection {
        source: "alb".into(),
        target: "web".into(),
        label: String::new(),
        protocol: Some("HTTPS".into()),
        port: None,
        estimated_monthly_gb: None,
    });
    spec.connections.push(Connection {
        source: "web".into(),
        target: "db".into(),
        label: String::new(),
        protocol: Some("TLS".into()),
        port: None,
        estimated_monthly_gb: None,
    });
    spec
}

/// Scenario 1: three-tier AWS spec prices every component in insertion
/// order, with notes capturing instance sizing, replica count and
/// multi-AZ/storage sizing.
#[test]
fn three_tier_aws_prices_every_component_in_order() {
    let (cw, _dir) = temp_cloudwright();
    let spec = three_tier_aws_spec();

    let estimate = cw.estimate(&spec, "on_demand");

    assert!(estimate.monthly_total > 0.0);
    assert_eq!(estimate.breakdown.len(), 4);
    assert_eq!(estimate.breakdown[0].component_id, "cdn");
    assert_eq!(estimate.breakdown[1].component_id, "alb");
    assert_eq!(estimate.breakdown[2].component_id, "web");
    assert_eq!(estimate.breakdown[3].component_id, "db");

    assert!(estimate.breakdown[2].notes.contains("m5.large"));
    assert!(estimate.breakdown[2].notes.contains("2x"));
    assert!(estimate.breakdown[3].notes.contains("Multi-AZ"));
    assert!(estimate.breakdown[3].notes.contains("100GB storage"));
}

/// Scenario 2: comparing the AWS spec against gcp/azure yields two
/// Alternatives, each repriced and carrying non-empty key differences
/// naming the service substitutions.
#[test]
fn cross_cloud_compare_reprices_and_lists_differences() {
    let (cw, _dir) = temp_cloudwright();
    let spec = three_tier_aws_spec();

    let alternatives = cw.compare_providers(&spec, &["gcp", "azure"]);

    assert_eq!(alternatives.len(), 2);
    for alt in &alternatives {
        assert!(alt.monthly_total > 0.0);
        assert_eq!(alt.spec.provider, alt.provider);
        assert!(!alt.key_differences.is_empty());
        assert!(alt.key_differences.len() <= 5);
    }

    let gcp_alt = alternatives.iter().find(|a| a.provider == Provider::Gcp).unwrap();
    assert!(gcp_alt.key_differences.iter().any(|d| d.contains("cloud_sql instead of rds")));
}

/// Scenario 3: an unhardened HIPAA-scoped spec with a bare `rds` component
/// fails HIPAA validation on the critical `encryption_at_rest` check.
#[test]
fn hipaa_fails_on_unhardened_spec() {
    let (cw, _dir) = temp_cloudwright();
    let mut spec = ArchSpec::new("hipaa-demo", Provider::Aws, "us-east-1");
    spec.components.push(Component {
        id: "db".into(),
        service: "rds".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 3,
        config: BTreeMap::new(),
    });

    let results = cw.validate(&spec, &["hipaa".to_string()], false);

    assert_eq!(results.len(), 1);
    let hipaa = &results[0];
    assert_eq!(hipaa.framework, "HIPAA");
    assert!(!hipaa.passed);

    let check = hipaa
        .checks
        .iter()
        .find(|c| c.name == "encryption_at_rest")
        .expect("encryption_at_rest check present");
    assert!(!check.passed);
    assert_eq!(check.severity, cloudwright_spec::Severity::Critical);
}

/// Scenario 4: running the same spec through the Post-Validator hardens
/// the db component (encryption/backup) so the HIPAA check now passes.
#[test]
fn hipaa_passes_encryption_check_after_post_validation() {
    let (cw, _dir) = temp_cloudwright();
    let mut spec = ArchSpec::new("hipaa-demo", Provider::Aws, "us-east-1");
    spec.components.push(Component {
        id: "db".into(),
        service: "rds".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 3,
        config: BTreeMap::new(),
    });

    let hardened = cw.harden(&spec);
    let db = hardened.component("db").unwrap();
    assert_eq!(db.config_bool("encryption"), Some(true));
    assert_eq!(db.config_bool("backup"), Some(true));

    let results = cw.validate(&hardened, &["hipaa".to_string()], false);
    let check = results[0]
        .checks
        .iter()
        .find(|c| c.name == "encryption_at_rest")
        .unwrap();
    assert!(check.passed);
}

/// Scenario 5: diffing a spec against itself plus one new component
/// reports that component as added and carries the cost delta.
#[test]
fn diff_reports_added_component_and_cost_delta() {
    let (cw, _dir) = temp_cloudwright();

    let mut old = ArchSpec::new("demo", Provider::Aws, "us-east-1");
    old.components.push(Component {
        id: "web".into(),
        service: "ec2".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 2,
        config: BTreeMap::new(),
    });
    old.components.push(Component {
        id: "db".into(),
        service: "rds".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 3,
        config: BTreeMap::new(),
    });
    old.components.push(Component {
        id: "alb".into(),
        service: "alb".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 1,
        config: BTreeMap::new(),
    });
    let old_priced = cw.price(&old, "on_demand");

    let mut new = old_priced.clone();
    new.components.push(Component {
        id: "cache".into(),
        service: "elasticache".into(),
        provider: Provider::Aws,
        label: None,
        description: String::new(),
        tier: 3,
        config: BTreeMap::new(),
    });
    new.cost_estimate = None;
    let new_priced = cw.price(&new, "on_demand");

    let result = cw.diff(&old_priced, &new_priced);

    assert_eq!(result.added.len(), 1);
    assert_eq!(result.added[0].id, "cache");
    assert!(result.removed.is_empty());
    assert!(result.summary.starts_with("Added 1"));

    let expected_delta =
        new_priced.cost_estimate.unwrap().monthly_total - old_priced.cost_estimate.unwrap().monthly_total;
    assert!((result.cost_delta - expected_delta).abs() < 0.01);
    assert!(result.cost_delta > 0.0);
}

/// Scenario 6: with `GCP_API_KEY` unset, a dry-run catalog refresh for
/// gcp degrades to zero fetched rows and no errors rather than raising.
#[tokio::test]
async fn gcp_refresh_degrades_to_empty_without_api_key() {
    std::env::remove_var("GCP_API_KEY");
    let (cw, _dir) = temp_cloudwright();

    let summary = cw.refresh(Some("gcp"), None, None, true).await;

    assert!(summary.dry_run);
    assert_eq!(summary.results.len(), 1);
    let gcp = &summary.results[0];
    assert_eq!(gcp.provider, "gcp");
    assert_eq!(gcp.instances_updated, 0);
    assert_eq!(gcp.managed_services_updated, 0);
    assert!(gcp.errors.is_empty());
}
