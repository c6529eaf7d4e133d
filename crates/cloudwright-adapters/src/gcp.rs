//! GCP Cloud Billing API adapter.
//!
//! Fetches compute and managed service pricing from the GCP Cloud Catalog
//! API (`https://cloudbilling.googleapis.com/v1/services/{id}/skus`).
//! Requires a `GCP_API_KEY` environment variable; gracefully degrades to
//! empty results when the key is absent or the request returns 401/403.

use async_trait::async_trait;
use serde_json::Value;

use crate::adapter::PricingAdapter;
use crate::error::{AdapterError, Result};
use crate::http::{client, get_bytes_or_unauthorized};
use crate::types::{InstancePrice, ManagedServicePrice};

const BASE_URL: &str = "https://cloudbilling.googleapis.com/v1";
const PAGE_SIZE: u32 = 500;

fn service_id(key: &str) -> &'static str {
    match key {
        "compute" => "6F81-5844-456A",
        "cloud_functions" => "9B50-17A3-3F3D",
        "cloud_storage" => "95FF-2EF5-5EA1",
        "cloud_sql" => "9662-B51E-5089",
        "bigquery" => "95FF-2EF5-5EA1",
        _ => "",
    }
}

fn region_to_gcp(region: &str) -> &str {
    const KNOWN: &[&str] = &[
        "us-east1", "us-central1", "us-west1", "us-west2", "europe-west1", "europe-west2", "asia-east1",
        "asia-southeast1", "asia-northeast1", "australia-southeast1", "southamerica-east1",
    ];
    KNOWN.iter().find(|r| **r == region).copied().unwrap_or(region)
}

fn extract_unit_price(pricing_info: &[Value]) -> f64 {
    for pi in pricing_info {
        let Some(tiers) = pi.pointer("/pricingExpression/tieredRates").and_then(|v| v.as_array()) else { continue };
        for tier in tiers {
            let nanos: f64 = tier.pointer("/unitPrice/nanos").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let units: f64 = tier
                .pointer("/unitPrice/units")
                .and_then(|v| v.as_str().and_then(|s| s.parse().ok()).or_else(|| v.as_f64()))
                .unwrap_or(0.0);
            let price = units + nanos / 1e9;
            if price > 0.0 {
                return price;
            }
        }
    }
    0.0
}

/// Checks whether `gcp_region` matches any of `service_regions`, honoring
/// `"global"` and parent-region prefixes (`"us"` matches `"us-east1"`).
fn region_matches(gcp_region: &str, service_regions: &[Value]) -> bool {
    service_regions.iter().filter_map(|v| v.as_str()).any(|sr| {
        sr == "global" || sr == gcp_region || gcp_region.starts_with(&format!("{sr}-"))
    })
}

/// Fetches GCP pricing from the Cloud Billing Catalog API.
///
/// Requires `GCP_API_KEY` in the environment (or passed to [`Self::new`]).
/// All methods return empty results, not errors, when the key is absent or
/// the API returns 401/403 — the refresh pipeline treats GCP as optional.
pub struct GcpPricingAdapter {
    client: reqwest::Client,
    api_key: String,
}

impl Default for GcpPricingAdapter {
    fn default() -> Self {
        GcpPricingAdapter {
            client: client(),
            api_key: std::env::var("GCP_API_KEY").unwrap_or_default(),
        }
    }
}

impl GcpPricingAdapter {
    pub fn new(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => GcpPricingAdapter { client: client(), api_key: key },
            None => Self::default(),
        }
    }

    async fn list_skus(&self, svc_id: &str) -> Result<Vec<Value>> {
        if self.api_key.is_empty() || svc_id.is_empty() {
            return Ok(Vec::new());
        }

        let mut skus = Vec::new();
        let mut page_token = String::new();
        loop {
            let mut url = format!("{BASE_URL}/services/{svc_id}/skus?key={}&pageSize={PAGE_SIZE}", self.api_key);
            if !page_token.is_empty() {
                url.push_str(&format!("&pageToken={page_token}"));
            }

            let Some(bytes) = get_bytes_or_unauthorized(&self.client, &url, "application/json").await? else {
                return Ok(Vec::new());
            };
            let data: Value = serde_json::from_slice(&bytes).map_err(|source| AdapterError::Parse { url, source })?;

            if let Some(page_skus) = data.get("skus").and_then(|v| v.as_array()) {
                skus.extend(page_skus.iter().cloned());
            }
            page_token = data.get("nextPageToken").and_then(|v| v.as_str()).unwrap_or("").to_string();
            if page_token.is_empty() {
                break;
            }
        }
        Ok(skus)
    }

    async fn parse_cloud_functions(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let skus = self.list_skus(service_id("cloud_functions")).await?;
        let gcp_region = region_to_gcp(region);
        let mut out = Vec::new();
        for sku in &skus {
            let regions = sku.get("serviceRegions").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            if !regions.is_empty() && !region_matches(gcp_region, &regions) {
                continue;
            }
            let desc = sku.get("description").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let desc_lower = desc.to_lowercase();
            let pricing_info = sku.get("pricingInfo").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            let price = extract_unit_price(&pricing_info);
            if price <= 0.0 {
                continue;
            }
            if desc_lower.contains("invocation") || desc_lower.contains("request") {
                out.push(ManagedServicePrice::new("cloud_functions", "per_invocation", 0.0, round4(price * 1_000_000.0), desc));
            } else if desc_lower.contains("compute time") || desc_lower.contains("gb-second") {
                out.push(ManagedServicePrice::new("cloud_functions", "per_gb_second", round6(price * 3600.0), 0.0, desc));
            }
        }
        Ok(out)
    }

    async fn parse_cloud_storage(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let skus = self.list_skus(service_id("cloud_storage")).await?;
        let gcp_region = region_to_gcp(region);
        let mut out = Vec::new();
        for sku in &skus {
            let regions = sku.get("serviceRegions").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            if !regions.is_empty() && !region_matches(gcp_region, &regions) {
                continue;
            }
            let desc = sku.get("description").and_then(|v| v.as_str()).unwrap_or("").to_string();
            if !desc.contains("Standard Storage") {
                continue;
            }
            let pricing_info = sku.get("pricingInfo").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            let price = extract_unit_price(&pricing_info);
            if price > 0.0 {
                out.push(ManagedServicePrice::new("cloud_storage", "standard_storage_gb", 0.0, price, desc));
            }
        }
        Ok(out)
    }

    async fn parse_cloud_sql(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let skus = self.list_skus(service_id("cloud_sql")).await?;
        let gcp_region = region_to_gcp(region);
        let mut out = Vec::new();
        for sku in &skus {
            let regions = sku.get("serviceRegions").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            if !regions.is_empty() && !regions.iter().filter_map(|v| v.as_str()).any(|r| r == gcp_region || r == "global") {
                continue;
            }
            let usage_type = sku.pointer("/category/usageType").and_then(|v| v.as_str()).unwrap_or("");
            if !matches!(usage_type, "OnDemand" | "") {
                continue;
            }
            let desc = sku.get("description").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let pricing_info = sku.get("pricingInfo").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            let price = extract_unit_price(&pricing_info);
            if price > 0.0 && desc.to_lowercase().contains("db-") {
                let sku_id = sku
                    .get("skuId")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| desc.chars().take(40).collect());
                out.push(ManagedServicePrice {
                    service: "cloud_sql".to_string(),
                    tier_name: sku_id,
                    price_per_hour: price,
                    price_per_month: round2(price * 730.0),
                    description: desc,
                    vcpus: 0,
                    memory_gb: 0.0,
                });
            }
        }
        Ok(out)
    }

    async fn parse_bigquery(&self, _region: &str) -> Result<Vec<ManagedServicePrice>> {
        let skus = self.list_skus("24E6-581D-38E5").await?;
        let mut out = Vec::new();
        for sku in &skus {
            let desc = sku.get("description").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let pricing_info = sku.get("pricingInfo").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            let price = extract_unit_price(&pricing_info);
            if price <= 0.0 {
                continue;
            }
            let desc_lower = desc.to_lowercase();
            if desc_lower.contains("active storage") {
                out.push(ManagedServicePrice::new("bigquery", "active_storage_gb", 0.0, price, desc));
            } else if desc_lower.contains("analysis") || desc_lower.contains("interactive") {
                out.push(ManagedServicePrice::new("bigquery", "per_tb_queried", 0.0, price, desc));
            }
        }
        Ok(out)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

#[async_trait]
impl PricingAdapter for GcpPricingAdapter {
    fn provider(&self) -> &'static str {
        "gcp"
    }

    async fn fetch_instance_pricing(&self, region: &str) -> Result<Vec<InstancePrice>> {
        let skus = self.list_skus(service_id("compute")).await?;
        let gcp_region = region_to_gcp(region);
        let mut out = Vec::new();

        for sku in &skus {
            let resource_family = sku.pointer("/category/resourceFamily").and_then(|v| v.as_str()).unwrap_or("");
            if resource_family != "Compute" {
                continue;
            }
            let usage_type = sku.pointer("/category/usageType").and_then(|v| v.as_str()).unwrap_or("");
            if !matches!(usage_type, "OnDemand" | "") {
                continue;
            }
            let resource_group = sku.pointer("/category/resourceGroup").and_then(|v| v.as_str()).unwrap_or("");
            if !matches!(resource_group, "CPU" | "N1Standard") {
                continue;
            }
            let regions = sku.get("serviceRegions").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            if !regions.is_empty() && !region_matches(gcp_region, &regions) {
                continue;
            }

            let desc = sku.get("description").and_then(|v| v.as_str()).unwrap_or("");
            let pricing_info = sku.get("pricingInfo").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            let price = extract_unit_price(&pricing_info);
            if price <= 0.0 {
                continue;
            }

            let sku_id = sku
                .get("skuId")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| desc.chars().take(40).collect());
            out.push(InstancePrice {
                instance_type: sku_id,
                region: region.to_string(),
                vcpus: 0,
                memory_gb: 0.0,
                price_per_hour: price,
                price_type: "on_demand".to_string(),
                os: "linux".to_string(),
                storage_desc: String::new(),
                network_bandwidth: String::new(),
            });
        }
        Ok(out)
    }

    async fn fetch_managed_service_pricing(&self, service: &str, region: &str) -> Result<Vec<ManagedServicePrice>> {
        match service {
            "cloud_functions" => self.parse_cloud_functions(region).await,
            "cloud_storage" => self.parse_cloud_storage(region).await,
            "cloud_sql" => self.parse_cloud_sql(region).await,
            "bigquery" => self.parse_bigquery(region).await,
            _ => Ok(Vec::new()),
        }
    }

    fn supported_managed_services(&self) -> &'static [&'static str] {
        &["cloud_functions", "cloud_storage", "cloud_sql", "bigquery"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_matches_parent_region() {
        let regions = vec![Value::String("us".to_string())];
        assert!(region_matches("us-east1", &regions));
    }

    #[test]
    fn region_matches_global() {
        let regions = vec![Value::String("global".to_string())];
        assert!(region_matches("asia-east1", &regions));
    }

    #[tokio::test]
    async fn no_api_key_degrades_to_empty() {
        let adapter = GcpPricingAdapter::new(Some(String::new()));
        let prices = adapter.fetch_instance_pricing("us-east1").await.unwrap();
        assert!(prices.is_empty());
    }
}
