//! Azure Retail Prices API adapter.
//!
//! Fetches compute and managed service pricing from
//! `https://prices.azure.com/api/retail/prices`. No API key required.
//! Uses OData filter expressions and follows `NextPageLink` for pagination.

use async_trait::async_trait;
use serde_json::Value;

use crate::adapter::PricingAdapter;
use crate::error::{AdapterError, Result};
use crate::http::{client, get_bytes};
use crate::types::{InstancePrice, ManagedServicePrice};

const BASE_URL: &str = "https://prices.azure.com/api/retail/prices";
const API_VERSION: &str = "2023-01-01-preview";

fn region_to_arm(region: &str) -> &str {
    const KNOWN: &[&str] = &[
        "eastus", "eastus2", "westus", "westus2", "centralus", "northeurope", "westeurope", "uksouth",
        "southeastasia", "eastasia", "japaneast", "australiaeast", "brazilsouth", "canadacentral",
    ];
    KNOWN.iter().find(|r| **r == region).copied().unwrap_or(region)
}

/// Fetches Azure pricing from the Retail Prices API (no auth required).
pub struct AzurePricingAdapter {
    client: reqwest::Client,
}

impl Default for AzurePricingAdapter {
    fn default() -> Self {
        AzurePricingAdapter { client: client() }
    }
}

impl AzurePricingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_url(odata_filter: &str) -> String {
        format!(
            "{BASE_URL}?api-version={API_VERSION}&$filter={}",
            urlencoding_encode(odata_filter)
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<Value> {
        let bytes = get_bytes(&self.client, url, "application/json").await?;
        serde_json::from_slice(&bytes).map_err(|source| AdapterError::Parse { url: url.to_string(), source })
    }

    async fn fetch_all(&self, odata_filter: &str) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut url = Self::build_url(odata_filter);
        loop {
            let data = self.fetch_page(&url).await?;
            if let Some(page_items) = data.get("Items").and_then(|v| v.as_array()) {
                items.extend(page_items.iter().cloned());
            }
            match data.get("NextPageLink").and_then(|v| v.as_str()) {
                Some(next) if !next.is_empty() => url = next.to_string(),
                _ => break,
            }
        }
        Ok(items)
    }

    async fn paginate_instances(&self, odata_filter: &str, region: &str) -> Result<Vec<InstancePrice>> {
        let mut out = Vec::new();
        let mut url = Self::build_url(odata_filter);
        loop {
            let data = self.fetch_page(&url).await?;
            if let Some(items) = data.get("Items").and_then(|v| v.as_array()) {
                for item in items {
                    let price = item.get("retailPrice").and_then(|v| v.as_f64()).unwrap_or(0.0);
                    if price <= 0.0 {
                        continue;
                    }
                    let sku_name = item.get("skuName").and_then(|v| v.as_str()).unwrap_or("");
                    let product_name = item.get("productName").and_then(|v| v.as_str()).unwrap_or("");
                    if ["Spot", "Low Priority"].iter().any(|kw| sku_name.contains(kw)) {
                        continue;
                    }
                    if ["Windows", "Spot", "Low Priority", "Dedicated Host", "Reserved"]
                        .iter()
                        .any(|kw| product_name.contains(kw))
                    {
                        continue;
                    }
                    let instance_type = item
                        .get("armSkuName")
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.is_empty())
                        .unwrap_or(sku_name)
                        .trim()
                        .to_string();
                    if instance_type.is_empty() {
                        continue;
                    }
                    out.push(InstancePrice {
                        instance_type,
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
            }
            match data.get("NextPageLink").and_then(|v| v.as_str()) {
                Some(next) if !next.is_empty() => url = next.to_string(),
                _ => break,
            }
        }
        Ok(out)
    }

    async fn parse_functions(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let arm_region = region_to_arm(region);
        let odata = format!("armRegionName eq '{arm_region}' and serviceName eq 'Azure Functions' and priceType eq 'Consumption'");
        let items = self.fetch_all(&odata).await?;
        let mut out = Vec::new();
        for item in &items {
            let price = item.get("retailPrice").and_then(|v| v.as_f64()).unwrap_or(0.0);
            if price <= 0.0 {
                continue;
            }
            let sku_desc = item.get("skuName").and_then(|v| v.as_str()).unwrap_or("");
            let meter = item.get("meterName").and_then(|v| v.as_str()).unwrap_or("").to_lowercase();
            let desc = item.get("productName").and_then(|v| v.as_str()).unwrap_or(sku_desc).to_string();
            if meter.contains("execution") || meter.contains("request") {
                out.push(ManagedServicePrice::new("azure_functions", "per_execution", 0.0, round4(price * 1_000_000.0), desc));
            } else if meter.contains("gb second") || meter.contains("duration") {
                out.push(ManagedServicePrice::new("azure_functions", "per_gb_second", round6(price * 3600.0), 0.0, desc));
            }
        }
        Ok(out)
    }

    async fn parse_blob(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let arm_region = region_to_arm(region);
        let odata = format!(
            "armRegionName eq '{arm_region}' and serviceName eq 'Storage' and skuName eq 'LRS' and meterName eq 'LRS Data Stored'"
        );
        let items = self.fetch_all(&odata).await?;
        let mut out = Vec::new();
        for item in &items {
            let price = item.get("retailPrice").and_then(|v| v.as_f64()).unwrap_or(0.0);
            if price > 0.0 {
                let desc = item.get("productName").and_then(|v| v.as_str()).unwrap_or("Blob Storage LRS").to_string();
                out.push(ManagedServicePrice::new("blob_storage", "lrs_gb", 0.0, price, desc));
            }
        }
        Ok(out)
    }

    async fn parse_sql(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let arm_region = region_to_arm(region);
        let odata = format!(
            "armRegionName eq '{arm_region}' and serviceName eq 'Azure SQL Database' and priceType eq 'Consumption' and skuName eq 'General Purpose'"
        );
        let items = self.fetch_all(&odata).await?;
        let mut out = Vec::new();
        for item in &items {
            let price = item.get("retailPrice").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let sku = item.get("skuName").and_then(|v| v.as_str()).unwrap_or("");
            let meter = item.get("meterName").and_then(|v| v.as_str()).unwrap_or("").to_lowercase();
            if price <= 0.0 || !meter.contains("vcore") {
                continue;
            }
            let tier_name = if sku.is_empty() { "general_purpose".to_string() } else { sku.to_string() };
            let desc = item.get("productName").and_then(|v| v.as_str()).unwrap_or(sku).to_string();
            out.push(ManagedServicePrice {
                service: "azure_sql".to_string(),
                tier_name,
                price_per_hour: price,
                price_per_month: round2(price * 730.0),
                description: desc,
                vcpus: 0,
                memory_gb: 0.0,
            });
        }
        Ok(out)
    }

    async fn parse_cosmos(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let arm_region = region_to_arm(region);
        let odata = format!("armRegionName eq '{arm_region}' and serviceName eq 'Azure Cosmos DB' and priceType eq 'Consumption'");
        let items = self.fetch_all(&odata).await?;
        let mut out = Vec::new();
        for item in &items {
            let price = item.get("retailPrice").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let meter = item.get("meterName").and_then(|v| v.as_str()).unwrap_or("").to_lowercase();
            let sku = item.get("skuName").and_then(|v| v.as_str()).unwrap_or("");
            if price <= 0.0 {
                continue;
            }
            let desc = item.get("productName").and_then(|v| v.as_str()).unwrap_or(sku).to_string();
            if meter.contains("request unit") || meter.contains("ru") {
                out.push(ManagedServicePrice::new("cosmos_db", "request_unit", 0.0, round4(price * 1_000_000.0), desc));
            } else if meter.contains("storage") {
                out.push(ManagedServicePrice::new("cosmos_db", "storage_gb", 0.0, price, desc));
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

/// Minimal percent-encoding for OData filter query strings — no external
/// urlencoding crate in the dependency stack, so this covers exactly the
/// characters that appear in the filter expressions built above.
fn urlencoding_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[async_trait]
impl PricingAdapter for AzurePricingAdapter {
    fn provider(&self) -> &'static str {
        "azure"
    }

    async fn fetch_instance_pricing(&self, region: &str) -> Result<Vec<InstancePrice>> {
        let arm_region = region_to_arm(region);
        let odata = format!(
            "armRegionName eq '{arm_region}' and serviceName eq 'Virtual Machines' and priceType eq 'Consumption'"
        );
        self.paginate_instances(&odata, region).await
    }

    async fn fetch_managed_service_pricing(&self, service: &str, region: &str) -> Result<Vec<ManagedServicePrice>> {
        match service {
            "azure_functions" => self.parse_functions(region).await,
            "blob_storage" => self.parse_blob(region).await,
            "azure_sql" => self.parse_sql(region).await,
            "cosmos_db" => self.parse_cosmos(region).await,
            _ => Ok(Vec::new()),
        }
    }

    fn supported_managed_services(&self) -> &'static [&'static str] {
        &["azure_functions", "blob_storage", "azure_sql", "cosmos_db"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_odata_filter() {
        let encoded = urlencoding_encode("armRegionName eq 'eastus'");
        assert!(encoded.contains("%20"));
        assert!(encoded.contains("%27"));
    }

    #[test]
    fn region_to_arm_passes_through_unknown() {
        assert_eq!(region_to_arm("brazilsouth"), "brazilsouth");
        assert_eq!(region_to_arm("not-a-region"), "not-a-region");
    }
}
