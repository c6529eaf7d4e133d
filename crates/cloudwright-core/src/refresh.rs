//! Catalog Refresh Pipeline: pulls live pricing from each provider's
//! adapter and upserts it into the [`Catalog`] store.
//!
//! Mirrors `catalog/refresh.py`'s `refresh_catalog` orchestrator: one
//! provider runs independently of the others, a failure on one provider
//! (a transport error, an unrecognized category) is collected into that
//! provider's [`RefreshResult`] rather than aborting the run, and
//! `dry_run` fetches and counts without writing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future;
use tracing::{info, warn};

use cloudwright_adapters::{AwsPricingAdapter, AzurePricingAdapter, GcpPricingAdapter, PricingAdapter};
use cloudwright_catalog::Catalog;

const ALL_PROVIDERS: &[&str] = &["aws", "gcp", "azure"];

fn default_region(provider: &str) -> &'static str {
    match provider {
        "aws" => "us-east-1",
        "gcp" => "us-central1",
        "azure" => "eastus",
        _ => "us-east-1",
    }
}

/// Outcome of refreshing a single provider.
#[derive(Debug, Clone, Default)]
pub struct RefreshResult {
    pub provider: String,
    pub region: String,
    pub instances_updated: usize,
    pub managed_services_updated: usize,
    pub errors: Vec<String>,
}

impl RefreshResult {
    fn new(provider: &str, region: &str) -> Self {
        RefreshResult { provider: provider.to_string(), region: region.to_string(), ..Default::default() }
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate outcome across every provider refreshed in one call.
#[derive(Debug, Clone, Default)]
pub struct RefreshSummary {
    pub results: Vec<RefreshResult>,
    pub dry_run: bool,
}

impl RefreshSummary {
    pub fn total_instances_updated(&self) -> usize {
        self.results.iter().map(|r| r.instances_updated).sum()
    }

    pub fn total_managed_services_updated(&self) -> usize {
        self.results.iter().map(|r| r.managed_services_updated).sum()
    }

    pub fn all_ok(&self) -> bool {
        self.results.iter().all(RefreshResult::ok)
    }
}

fn load_adapter(provider: &str) -> Option<Arc<dyn PricingAdapter>> {
    match provider {
        "aws" => Some(Arc::new(AwsPricingAdapter::new())),
        "gcp" => Some(Arc::new(GcpPricingAdapter::new(std::env::var("GCP_API_KEY").ok()))),
        "azure" => Some(Arc::new(AzurePricingAdapter::new())),
        _ => None,
    }
}

/// Refreshes one provider: instance pricing when `category` is absent or
/// equals `"compute"`, managed-service pricing otherwise (or also, when
/// `category` is absent). A `category` that substring-matches none of the
/// adapter's `supported_managed_services` falls back to refreshing all of
/// them, matching the Python original's permissive filtering.
async fn refresh_provider(catalog: &Catalog, provider: &str, category: Option<&str>, region: &str, dry_run: bool) -> RefreshResult {
    let mut result = RefreshResult::new(provider, region);

    let Some(adapter) = load_adapter(provider) else {
        result.errors.push(format!("unknown provider: {provider}"));
        return result;
    };

    let want_compute = category.is_none() || category == Some("compute");
    let want_managed = category.is_none() || category != Some("compute");

    if want_compute {
        match adapter.fetch_instance_pricing(region).await {
            Ok(rows) => {
                for row in &rows {
                    if dry_run {
                        continue;
                    }
                    if let Err(e) = catalog.upsert_instance_price(
                        provider,
                        &row.instance_type,
                        row.vcpus,
                        row.memory_gb,
                        &row.storage_desc,
                        &row.network_bandwidth,
                        &row.region,
                        &row.os,
                        row.price_per_hour,
                        &row.price_type,
                    ) {
                        result.errors.push(format!("{provider}: upsert instance {}: {e}", row.instance_type));
                    }
                }
                result.instances_updated += rows.len();
            }
            Err(e) => result.errors.push(format!("{provider}: instance pricing fetch failed: {e}")),
        }
    }

    if want_managed && category != Some("compute") {
        let supported = adapter.supported_managed_services();
        let services: Vec<&str> = match category {
            Some(wanted) if wanted != "compute" => {
                let matches: Vec<&str> = supported.iter().copied().filter(|s| s.contains(wanted)).collect();
                if matches.is_empty() {
                    supported.to_vec()
                } else {
                    matches
                }
            }
            _ => supported.to_vec(),
        };

        for service in services {
            match adapter.fetch_managed_service_pricing(service, region).await {
                Ok(tiers) => {
                    for tier in &tiers {
                        if dry_run {
                            continue;
                        }
                        if let Err(e) = catalog.upsert_managed_service(
                            provider,
                            &tier.service,
                            &tier.tier_name,
                            tier.price_per_hour,
                            tier.price_per_month,
                            tier.vcpus,
                            tier.memory_gb,
                            &tier.description,
                        ) {
                            result.errors.push(format!("{provider}: upsert managed service {service}: {e}"));
                        }
                    }
                    result.managed_services_updated += tiers.len();
                }
                Err(e) => result.errors.push(format!("{provider}: managed service {service} fetch failed: {e}")),
            }
        }
    }

    if !dry_run && result.errors.is_empty() {
        if let Err(e) = catalog.record_metadata(&format!("last_refresh:{provider}"), region, &Utc::now().to_rfc3339()) {
            warn!(provider, error = %e, "failed to record refresh metadata");
        }
    }

    result
}

/// Refreshes the catalog from live pricing feeds.
///
/// `provider`: `None` refreshes every provider in [`ALL_PROVIDERS`];
/// `Some("aws"|"gcp"|"azure")` refreshes only that one.
/// `region`: `None` uses each provider's default region.
/// `dry_run`: fetch and count without writing to the catalog.
///
/// Providers run concurrently; each provider's errors are collected into
/// its own [`RefreshResult`] rather than failing the whole run.
pub async fn refresh_catalog(
    catalog: Arc<Catalog>,
    provider: Option<&str>,
    category: Option<&str>,
    region: Option<&str>,
    dry_run: bool,
) -> RefreshSummary {
    let providers: Vec<&str> = match provider {
        Some(p) => vec![p],
        None => ALL_PROVIDERS.to_vec(),
    };

    info!(?providers, ?category, dry_run, "starting catalog refresh");

    let futures = providers.into_iter().map(|p| {
        let catalog = Arc::clone(&catalog);
        let p = p.to_string();
        let category = category.map(str::to_string);
        let region = region.map(str::to_string).unwrap_or_else(|| default_region(&p).to_string());
        async move { refresh_provider(&catalog, &p, category.as_deref(), &region, dry_run).await }
    });

    let results = future::join_all(futures).await;

    for result in &results {
        if result.ok() {
            info!(provider = %result.provider, instances = result.instances_updated, managed = result.managed_services_updated, "refresh complete");
        } else {
            warn!(provider = %result.provider, errors = ?result.errors, "refresh completed with errors");
        }
    }

    RefreshSummary { results, dry_run }
}

/// Per-provider breakdown keyed by provider name, for callers that want
/// `summary["aws"]` instead of scanning the result list.
pub fn index_by_provider(summary: &RefreshSummary) -> HashMap<&str, &RefreshResult> {
    summary.results.iter().map(|r| (r.provider.as_str(), r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_regions_match_adapters() {
        assert_eq!(default_region("aws"), "us-east-1");
        assert_eq!(default_region("gcp"), "us-central1");
        assert_eq!(default_region("azure"), "eastus");
    }

    #[test]
    fn refresh_result_ok_when_no_errors() {
        let mut result = RefreshResult::new("aws", "us-east-1");
        assert!(result.ok());
        result.errors.push("boom".to_string());
        assert!(!result.ok());
    }

    #[test]
    fn summary_aggregates_counts() {
        let summary = RefreshSummary {
            results: vec![
                RefreshResult { instances_updated: 3, managed_services_updated: 1, ..RefreshResult::new("aws", "us-east-1") },
                RefreshResult { instances_updated: 2, managed_services_updated: 4, ..RefreshResult::new("gcp", "us-central1") },
            ],
            dry_run: false,
        };
        assert_eq!(summary.total_instances_updated(), 5);
        assert_eq!(summary.total_managed_services_updated(), 5);
        assert!(summary.all_ok());
    }
}
