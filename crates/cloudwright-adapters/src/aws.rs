//! AWS Pricing API adapter.
//!
//! Streams EC2 instance pricing from the AWS Bulk Pricing CSV (region-scoped)
//! and parses managed service pricing from the AWS JSON Pricing API for
//! Lambda, S3, RDS, and DynamoDB.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::adapter::PricingAdapter;
use crate::error::{AdapterError, Result};
use crate::http::{client, get_bytes};
use crate::types::{InstancePrice, ManagedServicePrice};

const PRICING_BASE: &str = "https://pricing.us-east-1.amazonaws.com";

fn region_to_location(region: &str) -> &str {
    match region {
        "us-east-1" => "US East (N. Virginia)",
        "us-east-2" => "US East (Ohio)",
        "us-west-1" => "US West (N. California)",
        "us-west-2" => "US West (Oregon)",
        "eu-west-1" => "EU (Ireland)",
        "eu-west-2" => "EU (London)",
        "eu-central-1" => "EU (Frankfurt)",
        "ap-southeast-1" => "Asia Pacific (Singapore)",
        "ap-southeast-2" => "Asia Pacific (Sydney)",
        "ap-northeast-1" => "Asia Pacific (Tokyo)",
        "ap-south-1" => "Asia Pacific (Mumbai)",
        "ca-central-1" => "Canada (Central)",
        "sa-east-1" => "South America (Sao Paulo)",
        other => other,
    }
}

/// Parses `"16 GiB"` or `"16,384 MiB"` into GiB.
fn parse_memory_gib(mem: &str) -> f64 {
    let mem = mem.trim();
    let split_at = mem.find(|c: char| c.is_alphabetic());
    let Some(split_at) = split_at else { return 0.0 };
    let (number, unit) = mem.split_at(split_at);
    let Ok(value) = number.trim().replace(',', "").parse::<f64>() else { return 0.0 };
    if unit.trim().eq_ignore_ascii_case("MiB") {
        value / 1024.0
    } else {
        value
    }
}

fn first_price(terms: &Value) -> f64 {
    let Some(terms) = terms.as_object() else { return 0.0 };
    for term in terms.values() {
        let Some(dims) = term.get("priceDimensions").and_then(|d| d.as_object()) else { continue };
        for dim in dims.values() {
            let price = dim
                .get("pricePerUnit")
                .and_then(|u| u.get("USD"))
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(0.0);
            if price > 0.0 {
                return price;
            }
        }
    }
    0.0
}

/// Fetches AWS pricing from the bulk pricing API.
///
/// EC2 pricing is streamed from the CSV index; managed service pricing
/// uses the JSON API.
pub struct AwsPricingAdapter {
    client: reqwest::Client,
}

impl Default for AwsPricingAdapter {
    fn default() -> Self {
        AwsPricingAdapter { client: client() }
    }
}

impl AwsPricingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the EC2 pricing CSV: skips metadata rows preceding the
    /// header (the row whose first field is `SKU`), then filters to
    /// on-demand Linux shared-tenancy used-capacity compute instances.
    fn parse_ec2_csv(data: &[u8], region: &str) -> Result<Vec<InstancePrice>> {
        let text = String::from_utf8_lossy(data);
        let lines: Vec<&str> = text.lines().collect();
        let header_idx = lines
            .iter()
            .position(|line| line.trim().trim_matches('"').starts_with("SKU"))
            .unwrap_or(0);

        let csv_body = lines[header_idx..].join("\n");
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(csv_body.as_bytes());

        let mut out = Vec::new();
        for result in reader.deserialize::<HashMap<String, String>>() {
            let row = result.map_err(|source| AdapterError::Csv { url: format!("{PRICING_BASE} ec2 csv"), source })?;
            let get = |k: &str, default: &str| row.get(k).map(String::as_str).unwrap_or(default);

            if get("TermType", "") != "OnDemand" {
                continue;
            }
            if !matches!(get("Operating System", "Linux"), "Linux" | "") {
                continue;
            }
            if get("Tenancy", "Shared") != "Shared" {
                continue;
            }
            if get("CapacityStatus", "Used") != "Used" {
                continue;
            }
            if !matches!(get("Pre Installed S/W", "NA"), "NA" | "") {
                continue;
            }
            if get("productFamily", "Compute Instance") != "Compute Instance" {
                continue;
            }

            let price: f64 = get("PricePerUnit", "0").parse().unwrap_or(0.0);
            if price <= 0.0 {
                continue;
            }

            out.push(InstancePrice {
                instance_type: get("Instance Type", "").to_string(),
                region: region.to_string(),
                vcpus: get("vCPU", "0").parse().unwrap_or(0),
                memory_gb: parse_memory_gib(get("Memory", "0 GiB")),
                price_per_hour: price,
                price_type: "on_demand".to_string(),
                os: "linux".to_string(),
                storage_desc: get("Storage", "").to_string(),
                network_bandwidth: get("Network Performance", "").to_string(),
            });
        }
        Ok(out)
    }

    async fn fetch_json(&self, offer_code: &str, region: &str) -> Result<Value> {
        let url = format!("{PRICING_BASE}/offers/v1.0/aws/{offer_code}/current/{region}/index.json");
        let bytes = get_bytes(&self.client, &url, "*/*").await?;
        serde_json::from_slice(&bytes).map_err(|source| AdapterError::Parse { url, source })
    }

    async fn parse_lambda(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let data = self.fetch_json("AWSLambda", region).await?;
        let location = region_to_location(region);
        let on_demand = data.pointer("/terms/OnDemand").cloned().unwrap_or_default();
        let mut out = Vec::new();

        let Some(products) = data.get("products").and_then(|p| p.as_object()) else { return Ok(out) };
        for (sku, product) in products {
            let loc = product.pointer("/attributes/location").and_then(|v| v.as_str()).unwrap_or("");
            if loc != location && loc != region {
                continue;
            }
            let Some(sku_terms) = on_demand.get(sku).and_then(|t| t.as_object()) else { continue };
            for term in sku_terms.values() {
                let Some(dims) = term.get("priceDimensions").and_then(|d| d.as_object()) else { continue };
                for dim in dims.values() {
                    let unit = dim.get("unit").and_then(|v| v.as_str()).unwrap_or("").to_lowercase();
                    let desc = dim.get("description").and_then(|v| v.as_str()).unwrap_or("").to_string();
                    let price: f64 = dim
                        .pointer("/pricePerUnit/USD")
                        .and_then(|v| v.as_str())
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0.0);
                    if unit.contains("request") || desc.to_lowercase().contains("request") {
                        out.push(ManagedServicePrice::new("lambda", "per_request", 0.0, round4(price * 1_000_000.0), desc));
                    } else if unit.contains("second") || unit.contains("gb-second") {
                        out.push(ManagedServicePrice::new("lambda", "per_gb_second", round6(price * 3600.0), 0.0, desc));
                    }
                }
            }
        }
        Ok(out)
    }

    async fn parse_s3(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let url = format!("{PRICING_BASE}/offers/v1.0/aws/AmazonS3/current/index.json");
        let bytes = get_bytes(&self.client, &url, "*/*").await?;
        let data: Value = serde_json::from_slice(&bytes).map_err(|source| AdapterError::Parse { url, source })?;
        let location = region_to_location(region);
        let on_demand = data.pointer("/terms/OnDemand").cloned().unwrap_or_default();
        let mut out = Vec::new();

        let Some(products) = data.get("products").and_then(|p| p.as_object()) else { return Ok(out) };
        for (sku, product) in products {
            let attrs = product.get("attributes").cloned().unwrap_or_default();
            if attrs.get("location").and_then(|v| v.as_str()) != Some(location) {
                continue;
            }
            if attrs.get("storageClass").and_then(|v| v.as_str()) != Some("General Purpose") {
                continue;
            }
            if attrs.get("volumeType").and_then(|v| v.as_str()) != Some("Standard") {
                continue;
            }
            let Some(sku_terms) = on_demand.get(sku).and_then(|t| t.as_object()) else { continue };
            for term in sku_terms.values() {
                let Some(dims) = term.get("priceDimensions").and_then(|d| d.as_object()) else { continue };
                for dim in dims.values() {
                    let price: f64 = dim
                        .pointer("/pricePerUnit/USD")
                        .and_then(|v| v.as_str())
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0.0);
                    if price > 0.0 {
                        let desc = dim.get("description").and_then(|v| v.as_str()).unwrap_or("").to_string();
                        out.push(ManagedServicePrice::new("s3", "standard_storage_gb", 0.0, price, desc));
                    }
                }
            }
        }
        Ok(out)
    }

    async fn parse_rds(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let data = self.fetch_json("AmazonRDS", region).await?;
        let location = region_to_location(region);
        let on_demand = data.pointer("/terms/OnDemand").cloned().unwrap_or_default();
        let mut out = Vec::new();

        let Some(products) = data.get("products").and_then(|p| p.as_object()) else { return Ok(out) };
        for (sku, product) in products {
            let attrs = product.get("attributes").cloned().unwrap_or_default();
            let loc = attrs.get("location").and_then(|v| v.as_str()).unwrap_or("");
            if loc != location && loc != region {
                continue;
            }
            let engine = attrs.get("databaseEngine").and_then(|v| v.as_str()).unwrap_or("");
            if !matches!(engine, "PostgreSQL" | "MySQL") {
                continue;
            }
            if attrs.get("deploymentOption").and_then(|v| v.as_str()) != Some("Single-AZ") {
                continue;
            }
            let db_class = attrs.get("instanceType").and_then(|v| v.as_str()).unwrap_or("");
            if db_class.is_empty() {
                continue;
            }

            let sku_terms = on_demand.get(sku).cloned().unwrap_or_default();
            let price = first_price(&sku_terms);
            if price > 0.0 {
                let vcpus = attrs.get("vcpu").and_then(|v| v.as_str()).and_then(|s| s.parse().ok()).unwrap_or(0);
                let memory_gb = attrs.get("memory").and_then(|v| v.as_str()).map(parse_memory_gib).unwrap_or(0.0);
                out.push(ManagedServicePrice {
                    service: "rds".to_string(),
                    tier_name: db_class.to_string(),
                    price_per_hour: price,
                    price_per_month: round2(price * 730.0),
                    description: format!("{engine} {db_class} Single-AZ"),
                    vcpus,
                    memory_gb,
                });
            }
        }
        Ok(out)
    }

    async fn parse_dynamodb(&self, region: &str) -> Result<Vec<ManagedServicePrice>> {
        let data = self.fetch_json("AmazonDynamoDB", region).await?;
        let location = region_to_location(region);
        let on_demand = data.pointer("/terms/OnDemand").cloned().unwrap_or_default();
        let mut out = Vec::new();

        let Some(products) = data.get("products").and_then(|p| p.as_object()) else { return Ok(out) };
        for (sku, product) in products {
            let attrs = product.get("attributes").cloned().unwrap_or_default();
            let loc = attrs.get("location").and_then(|v| v.as_str()).unwrap_or("");
            if loc != location && loc != region {
                continue;
            }
            let group = attrs.get("group").and_then(|v| v.as_str()).unwrap_or("").to_lowercase();
            let Some(sku_terms) = on_demand.get(sku).and_then(|t| t.as_object()) else { continue };
            for term in sku_terms.values() {
                let Some(dims) = term.get("priceDimensions").and_then(|d| d.as_object()) else { continue };
                for dim in dims.values() {
                    let price: f64 = dim
                        .pointer("/pricePerUnit/USD")
                        .and_then(|v| v.as_str())
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0.0);
                    let dim_desc = dim.get("description").and_then(|v| v.as_str()).unwrap_or("").to_string();
                    if price <= 0.0 {
                        continue;
                    }
                    let dim_desc_lower = dim_desc.to_lowercase();
                    if group.contains("write") || dim_desc_lower.contains("write") {
                        out.push(ManagedServicePrice::new("dynamodb", "write_request_unit", 0.0, round4(price * 1_000_000.0), dim_desc));
                    } else if group.contains("read") || dim_desc_lower.contains("read") {
                        out.push(ManagedServicePrice::new("dynamodb", "read_request_unit", 0.0, round4(price * 1_000_000.0), dim_desc));
                    }
                }
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
impl PricingAdapter for AwsPricingAdapter {
    fn provider(&self) -> &'static str {
        "aws"
    }

    async fn fetch_instance_pricing(&self, region: &str) -> Result<Vec<InstancePrice>> {
        let url = format!("{PRICING_BASE}/offers/v1.0/aws/AmazonEC2/current/{region}/index.csv");
        let bytes = get_bytes(&self.client, &url, "*/*").await?;
        Self::parse_ec2_csv(&bytes, region)
    }

    async fn fetch_managed_service_pricing(&self, service: &str, region: &str) -> Result<Vec<ManagedServicePrice>> {
        match service {
            "lambda" => self.parse_lambda(region).await,
            "s3" => self.parse_s3(region).await,
            "rds" => self.parse_rds(region).await,
            "dynamodb" => self.parse_dynamodb(region).await,
            _ => Ok(Vec::new()),
        }
    }

    fn supported_managed_services(&self) -> &'static [&'static str] {
        &["lambda", "s3", "rds", "dynamodb"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_memory_gib() {
        assert_eq!(parse_memory_gib("16 GiB"), 16.0);
        assert_eq!(parse_memory_gib("16,384 MiB"), 16.0);
        assert_eq!(parse_memory_gib("garbage"), 0.0);
    }

    #[test]
    fn parse_ec2_csv_skips_metadata_and_filters() {
        let csv = "\
formatVersion,v1.0\n\
disclaimer,blah\n\
\"SKU\",\"TermType\",\"Operating System\",\"Tenancy\",\"CapacityStatus\",\"Pre Installed S/W\",\"productFamily\",\"Instance Type\",\"vCPU\",\"Memory\",\"PricePerUnit\",\"Storage\",\"Network Performance\"\n\
ABC123,OnDemand,Linux,Shared,Used,NA,Compute Instance,m5.large,2,8 GiB,0.096,EBS only,Up to 10 Gigabit\n\
DEF456,Reserved,Linux,Shared,Used,NA,Compute Instance,m5.large,2,8 GiB,0.05,EBS only,Up to 10 Gigabit\n";
        let rows = AwsPricingAdapter::parse_ec2_csv(csv.as_bytes(), "us-east-1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].instance_type, "m5.large");
        assert_eq!(rows[0].price_per_hour, 0.096);
    }
}
