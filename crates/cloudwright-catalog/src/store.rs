use std::path::{Path, PathBuf};

use cloudwright_registry::ServiceRegistry;
use cloudwright_spec::ConfigMap;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{CatalogIoError, Result};
use crate::schema::{PROVIDERS, REGION_MAP, SCHEMA};
use crate::seed_data;
use crate::seed_types::{ComputeFile, DatabaseFile, EquivalencesFile};

/// Multiplicative discount applied for each pricing tier.
pub(crate) const PRICING_MULTIPLIERS: &[(&str, f64)] = &[
    ("on_demand", 1.0),
    ("reserved_1yr", 0.6),
    ("reserved_3yr", 0.4),
    ("spot", 0.3),
];

/// Discount multiplier for a pricing tier (on-demand/reserved/spot),
/// applied wherever a price is resolved outside the catalog's own
/// tier-1 lookups (those already fold the multiplier in).
pub fn pricing_multiplier(tier: &str) -> f64 {
    PRICING_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == tier)
        .map(|(_, mult)| *mult)
        .unwrap_or(1.0)
}

fn config_str<'a>(config: &'a ConfigMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| config.get(*k).and_then(|v| v.as_str()))
}

fn config_f64(config: &ConfigMap, key: &str, default: f64) -> f64 {
    config.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
}

fn config_bool(config: &ConfigMap, key: &str) -> bool {
    config.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// One row from `instance_types` joined with its `us_east` on-demand price.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRow {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub family: Option<String>,
    pub family_normalized: Option<String>,
    pub vcpus: i64,
    pub memory_gb: f64,
    pub storage_desc: Option<String>,
    pub gpu_count: i64,
    pub network_bandwidth: Option<String>,
    pub arch: String,
    pub price_per_hour: Option<f64>,
    pub price_type: Option<String>,
    pub region_code: Option<String>,
}

impl InstanceRow {
    pub fn price_per_month(&self) -> Option<f64> {
        self.price_per_hour.map(|h| (h * 730.0 * 100.0).round() / 100.0)
    }
}

/// Search filters for [`Catalog::search`]. All fields are optional and
/// compose as AND predicates.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub vcpus: Option<i64>,
    pub memory_gb: Option<f64>,
    pub provider: Option<String>,
    pub max_price_per_hour: Option<f64>,
    pub limit: i64,
}

impl SearchQuery {
    pub fn new() -> Self {
        SearchQuery { limit: 20, ..Default::default() }
    }
}

/// Persistent keyed store of instance types, per-region prices, managed
/// service tiers, and cross-cloud equivalences. Auto-seeds from bundled
/// JSON on first open of a fresh database file.
///
/// Each call opens its own connection (mirroring the source's
/// per-call `sqlite3.connect`); WAL mode lets concurrent readers proceed
/// while a single [`parking_lot::Mutex`] serializes writers within this
/// process.
pub struct Catalog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Catalog {
    /// Opens (creating if necessary) the catalog store at `path`. Seeds
    /// from bundled data on first creation of an empty `instance_types`
    /// table. A failure to open or seed is fatal — see
    /// [`CatalogIoError`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let catalog = Catalog {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };
        catalog.ensure_db()?;
        Ok(catalog)
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).map_err(|source| CatalogIoError::Open {
            path: self.path.display().to_string(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(CatalogIoError::Query)?;
        Ok(conn)
    }

    fn ensure_db(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA).map_err(CatalogIoError::Seed)?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM instance_types", [], |r| r.get(0))
            .map_err(CatalogIoError::Query)?;
        if count == 0 {
            self.seed(&conn)?;
        }
        Ok(())
    }

    /// Loads bundled compute/database/networking/storage/equivalence JSON
    /// into a fresh database, all inside the caller's transaction so a
    /// failure rolls the whole seed back.
    fn seed(&self, conn: &Connection) -> Result<()> {
        for (pid, name) in PROVIDERS {
            conn.execute(
                "INSERT OR IGNORE INTO providers (id, name) VALUES (?1, ?2)",
                params![pid, name],
            )
            .map_err(CatalogIoError::Seed)?;
        }

        for (provider, regions) in REGION_MAP {
            for (code, normalized, name) in *regions {
                let rid = format!("{provider}:{code}");
                conn.execute(
                    "INSERT OR IGNORE INTO regions (id, provider_id, code, name, normalized) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![rid, provider, code, name, normalized],
                )
                .map_err(CatalogIoError::Seed)?;
            }
        }

        for (provider, contents) in seed_data::COMPUTE {
            self.load_compute(conn, provider, contents)?;
        }
        for (provider, contents) in seed_data::DATABASE {
            self.load_managed_db(conn, provider, contents)?;
        }
        for (provider, contents) in seed_data::NETWORKING {
            self.load_json_managed(conn, provider, "net", crate::schema::NETWORKING_KEYS, contents)?;
        }
        for (provider, contents) in seed_data::STORAGE {
            self.load_json_managed(conn, provider, "storage", crate::schema::STORAGE_KEYS, contents)?;
        }
        self.load_equivalences(conn, seed_data::EQUIVALENCES)?;

        let registry = ServiceRegistry::load_embedded().map_err(CatalogIoError::Registry)?;
        self.sync_registry_conn(conn, &registry)?;

        Ok(())
    }

    fn load_compute(&self, conn: &Connection, provider: &str, contents: &str) -> Result<()> {
        let data: ComputeFile = serde_json::from_str(contents).map_err(|source| CatalogIoError::SeedData {
            file: format!("{provider}/compute.json"),
            source,
        })?;
        for inst in data.instances {
            let inst_id = format!("{provider}:{}", inst.name);
            conn.execute(
                "INSERT OR IGNORE INTO instance_types
                 (id, provider_id, name, family, family_normalized, vcpus, memory_gb,
                  storage_desc, gpu_count, network_bandwidth, arch, generation, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    inst_id,
                    provider,
                    inst.name,
                    inst.family,
                    inst.family_normalized,
                    inst.vcpus,
                    inst.memory_gb,
                    inst.storage_desc,
                    inst.gpu_count,
                    inst.network_bandwidth,
                    inst.arch,
                    inst.generation,
                    inst.description,
                ],
            )
            .map_err(CatalogIoError::Seed)?;

            for pr in inst.pricing {
                let region_id = format!("{provider}:{}", pr.region);
                for (os, price) in &pr.prices {
                    conn.execute(
                        "INSERT OR IGNORE INTO pricing
                         (instance_type_id, region_id, os, price_per_hour, price_type)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![inst_id, region_id, os, price, pr.price_type],
                    )
                    .map_err(CatalogIoError::Seed)?;
                }
            }
        }
        Ok(())
    }

    fn load_managed_db(&self, conn: &Connection, provider: &str, contents: &str) -> Result<()> {
        let data: DatabaseFile = serde_json::from_str(contents).map_err(|source| CatalogIoError::SeedData {
            file: format!("{provider}/database.json"),
            source,
        })?;
        for tier in data.tiers {
            let tier_id = format!("{provider}:{}:{}", data.service, tier.name);
            let price_us = tier.pricing.values().next().copied().unwrap_or(0.0);
            let monthly = (price_us * 730.0 * 100.0).round() / 100.0;
            let notes = format!(
                "storage_per_gb={}, multi_az_mult={}",
                data.storage_per_gb, data.multi_az_multiplier
            );
            conn.execute(
                "INSERT OR IGNORE INTO managed_services
                 (id, provider_id, service, tier_name, price_per_hour, price_per_month, vcpus, memory_gb, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![tier_id, provider, data.service, tier.name, price_us, monthly, tier.vcpus, tier.memory_gb, notes],
            )
            .map_err(CatalogIoError::Seed)?;
        }
        Ok(())
    }

    /// Shared loader for the networking.json/storage.json seed files: both
    /// are `{service_key: {...free-form fields...}}` maps stored verbatim
    /// as JSON in `managed_services.notes`.
    fn load_json_managed(
        &self,
        conn: &Connection,
        provider: &str,
        namespace: &str,
        keys: &[&str],
        contents: &str,
    ) -> Result<()> {
        let data: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(contents).map_err(|source| CatalogIoError::SeedData {
                file: format!("{provider}/{namespace}.json"),
                source,
            })?;
        for svc_key in keys {
            let Some(svc_data) = data.get(*svc_key) else { continue };
            let fixed = svc_data
                .get("fixed_per_month")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let sid = format!("{provider}:{namespace}:{svc_key}");
            let hourly = if fixed > 0.0 { fixed / 730.0 } else { 0.0 };
            conn.execute(
                "INSERT OR IGNORE INTO managed_services
                 (id, provider_id, service, tier_name, price_per_hour, price_per_month, notes)
                 VALUES (?1, ?2, ?3, 'default', ?4, ?5, ?6)",
                params![sid, provider, svc_key, hourly, fixed, svc_data.to_string()],
            )
            .map_err(CatalogIoError::Seed)?;
        }
        Ok(())
    }

    fn load_equivalences(&self, conn: &Connection, contents: &str) -> Result<()> {
        let data: EquivalencesFile =
            serde_json::from_str(contents).map_err(|source| CatalogIoError::SeedData {
                file: "equivalences.json".to_string(),
                source,
            })?;
        for eq in data.equivalences {
            let mut pairs: Vec<(String, String)> = Vec::new();
            if let (Some(aws), Some(gcp)) = (&eq.aws, &eq.gcp) {
                pairs.push((format!("aws:{aws}"), format!("gcp:{gcp}")));
            }
            if let (Some(aws), Some(azure)) = (&eq.aws, &eq.azure) {
                pairs.push((format!("aws:{aws}"), format!("azure:{azure}")));
            }
            if let (Some(gcp), Some(azure)) = (&eq.gcp, &eq.azure) {
                pairs.push((format!("gcp:{gcp}"), format!("azure:{azure}")));
            }
            for (a, b) in pairs {
                conn.execute(
                    "INSERT OR IGNORE INTO equivalences (instance_a_id, instance_b_id, confidence, match_type) VALUES (?1, ?2, ?3, ?4)",
                    params![a, b, eq.confidence, eq.match_type],
                )
                .map_err(CatalogIoError::Seed)?;
            }
        }
        Ok(())
    }

    /// Searches instances by text query and/or vcpu/memory/price bounds.
    /// Results are sorted by price ascending, with unpriced rows last.
    ///
    /// The WHERE clause is assembled only from hardcoded predicate
    /// fragments below; every value the caller supplies travels through a
    /// bound `?` placeholder, never string interpolation.
    pub fn search(&self, q: &SearchQuery) -> Result<Vec<InstanceRow>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(provider) = &q.provider {
            conditions.push("i.provider_id = ?".to_string());
            params.push(Box::new(provider.clone()));
        }
        if let Some(vcpus) = q.vcpus {
            conditions.push("i.vcpus >= ?".to_string());
            params.push(Box::new(vcpus));
        }
        if let Some(memory_gb) = q.memory_gb {
            conditions.push("i.memory_gb >= ?".to_string());
            params.push(Box::new(memory_gb));
        }
        if let Some(max_price) = q.max_price_per_hour {
            conditions.push("p.price_per_hour <= ?".to_string());
            params.push(Box::new(max_price));
        }
        if let Some(text) = &q.query {
            conditions.push("(i.name LIKE ? OR i.family LIKE ? OR i.description LIKE ?)".to_string());
            let like = format!("%{text}%");
            params.push(Box::new(like.clone()));
            params.push(Box::new(like.clone()));
            params.push(Box::new(like));
        }

        let where_clause = if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        };

        let sql = format!(
            "SELECT DISTINCT i.id, i.provider_id, i.name, i.family, i.family_normalized,
                    i.vcpus, i.memory_gb, i.storage_desc, i.gpu_count, i.network_bandwidth,
                    i.arch, p.price_per_hour, p.price_type, r.code as region_code
             FROM instance_types i
             LEFT JOIN pricing p ON p.instance_type_id = i.id AND p.os = 'linux' AND p.price_type = 'on_demand'
             LEFT JOIN regions r ON r.id = p.region_id AND r.normalized = 'us_east'
             WHERE {where_clause}
             ORDER BY COALESCE(p.price_per_hour, 999999) ASC
             LIMIT ?"
        );
        params.push(Box::new(q.limit));

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql).map_err(CatalogIoError::Query)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_instance)
            .map_err(CatalogIoError::Query)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(CatalogIoError::Query)
    }

    /// Compares specific instances side by side: tries each name as-is,
    /// then prefixed with each provider in turn.
    pub fn compare(&self, instance_names: &[&str]) -> Result<Vec<InstanceRow>> {
        let conn = self.connect()?;
        let mut results = Vec::new();
        for name in instance_names {
            if let Some(row) = Self::find_by_name_or_id(&conn, name, &Self::candidate_id(name))? {
                results.push(row);
                continue;
            }
            let mut found = None;
            for prefix in ["aws:", "gcp:", "azure:"] {
                let candidate = format!("{prefix}{name}");
                if candidate == Self::candidate_id(name) {
                    continue;
                }
                if let Some(row) = Self::find_by_id(&conn, &candidate)? {
                    found = Some(row);
                    break;
                }
            }
            if let Some(row) = found {
                results.push(row);
            }
        }
        Ok(results)
    }

    fn candidate_id(name: &str) -> String {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("aws:{name}")
        }
    }

    fn find_by_name_or_id(conn: &Connection, name: &str, id: &str) -> Result<Option<InstanceRow>> {
        conn.query_row(
            "SELECT i.id, i.provider_id, i.name, i.family, i.family_normalized,
                    i.vcpus, i.memory_gb, i.storage_desc, i.gpu_count, i.network_bandwidth,
                    i.arch, p.price_per_hour, p.price_type, r.code as region_code
             FROM instance_types i
             LEFT JOIN pricing p ON p.instance_type_id = i.id AND p.os = 'linux' AND p.price_type = 'on_demand'
             LEFT JOIN regions r ON r.id = p.region_id AND r.normalized = 'us_east'
             WHERE i.name = ?1 OR i.id = ?2
             LIMIT 1",
            params![name, id],
            Self::row_to_instance,
        )
        .optional()
        .map_err(CatalogIoError::Query)
    }

    fn find_by_id(conn: &Connection, id: &str) -> Result<Option<InstanceRow>> {
        conn.query_row(
            "SELECT i.id, i.provider_id, i.name, i.family, i.family_normalized,
                    i.vcpus, i.memory_gb, i.storage_desc, i.gpu_count, i.network_bandwidth,
                    i.arch, p.price_per_hour, p.price_type, r.code as region_code
             FROM instance_types i
             LEFT JOIN pricing p ON p.instance_type_id = i.id AND p.os = 'linux' AND p.price_type = 'on_demand'
             LEFT JOIN regions r ON r.id = p.region_id AND r.normalized = 'us_east'
             WHERE i.id = ?1
             LIMIT 1",
            params![id],
            Self::row_to_instance,
        )
        .optional()
        .map_err(CatalogIoError::Query)
    }

    /// Finds a single instance by bare name or fully-qualified `provider:name` id.
    pub fn find_instance(&self, name: &str) -> Result<Option<InstanceRow>> {
        let conn = self.connect()?;
        Self::find_by_name_or_id(&conn, name, name)
    }

    fn row_to_instance(row: &rusqlite::Row<'_>) -> rusqlite::Result<InstanceRow> {
        Ok(InstanceRow {
            id: row.get(0)?,
            provider: row.get(1)?,
            name: row.get(2)?,
            family: row.get(3)?,
            family_normalized: row.get(4)?,
            vcpus: row.get(5)?,
            memory_gb: row.get(6)?,
            storage_desc: row.get(7)?,
            gpu_count: row.get(8)?,
            network_bandwidth: row.get(9)?,
            arch: row.get(10)?,
            price_per_hour: row.get(11)?,
            price_type: row.get(12)?,
            region_code: row.get(13)?,
        })
    }

    /// Tier 1 of the Cost Engine's resolution pipeline: catalog-backed
    /// pricing for a service, dispatched by service-family. Returns `None`
    /// when the service is unknown to this branch, signalling the caller
    /// to fall through to Tier 2.
    pub fn get_service_pricing(
        &self,
        service: &str,
        provider: &str,
        config: &ConfigMap,
        pricing_tier: &str,
    ) -> Result<Option<f64>> {
        let base = self.base_price(service, provider, config)?;
        Ok(base.map(|b| (b * pricing_multiplier(pricing_tier) * 100.0).round() / 100.0))
    }

    fn base_price(&self, service: &str, provider: &str, config: &ConfigMap) -> Result<Option<f64>> {
        match service {
            "ec2" | "compute_engine" | "virtual_machines" => {
                let instance_type = config_str(config, &["instance_type", "machine_type", "vm_size"]);
                let Some(instance_type) = instance_type else { return Ok(None) };
                let Some(inst) = self.find_instance(instance_type)? else { return Ok(None) };
                let Some(hourly) = inst.price_per_hour else { return Ok(None) };
                let count = config_f64(config, "count", 1.0);
                Ok(Some((hourly * 730.0 * count * 100.0).round() / 100.0))
            }
            "rds" | "aurora" | "cloud_sql" | "azure_sql" => {
                self.price_relational_db(service, provider, config)
            }
            "s3" | "cloud_storage" | "blob_storage" => self.price_object_storage(service, provider, config),
            "alb" | "nlb" | "app_gateway" | "azure_lb" | "cloud_load_balancing" => {
                self.price_load_balancer(service, provider, config)
            }
            "cloudfront" | "cloud_cdn" | "azure_cdn" => self.price_cdn(service, provider, config),
            "elasticache" | "memorystore" | "azure_cache" => self.price_cache(service, provider, config),
            "lambda" | "cloud_functions" | "azure_functions" => Ok(Some(Self::price_serverless(config))),
            "sqs" | "pub_sub" | "service_bus" => {
                let monthly_requests = config_f64(config, "monthly_requests", 10_000_000.0);
                let per_million = if service == "sqs" { 0.40 } else { 0.60 };
                Ok(Some(((monthly_requests / 1_000_000.0) * per_million * 100.0).round() / 100.0))
            }
            "dynamodb" | "firestore" | "cosmos_db" => {
                if config_str(config, &["billing_mode"]) == Some("provisioned") {
                    let rcu = config_f64(config, "read_capacity", 5.0);
                    let wcu = config_f64(config, "write_capacity", 5.0);
                    Ok(Some(((wcu * 0.00065 * 730.0 + rcu * 0.00013 * 730.0) * 100.0).round() / 100.0))
                } else {
                    Ok(Some(25.0))
                }
            }
            _ => Ok(None),
        }
    }

    fn price_relational_db(&self, service: &str, provider: &str, config: &ConfigMap) -> Result<Option<f64>> {
        let instance_class = config_str(config, &["instance_class", "tier"]);
        if let Some(instance_class) = instance_class {
            let lookup_service = if service == "aurora" { "rds" } else { service };
            let conn = self.connect()?;
            let row: Option<(f64, String)> = conn
                .query_row(
                    "SELECT price_per_hour, notes FROM managed_services WHERE provider_id = ?1 AND service = ?2 AND tier_name = ?3",
                    params![provider, lookup_service, instance_class],
                    |r| Ok((r.get(0)?, r.get(1)?)),
                )
                .optional()
                .map_err(CatalogIoError::Query)?;
            if let Some((hourly, notes)) = row {
                let mut monthly = (hourly * 730.0 * 100.0).round() / 100.0;
                let storage_gb = config_f64(config, "storage_gb", 20.0);
                let storage_rate = notes
                    .split("storage_per_gb=")
                    .nth(1)
                    .and_then(|rest| rest.split(',').next())
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .unwrap_or(0.115);
                monthly += (storage_gb * storage_rate * 100.0).round() / 100.0;
                if config_bool(config, "multi_az") {
                    monthly = ((monthly + hourly * 730.0) * 100.0).round() / 100.0;
                }
                return Ok(Some(monthly));
            }
        }
        Ok(Some(crate::formula::default_managed_price(service, config)))
    }

    fn price_object_storage(&self, service: &str, provider: &str, config: &ConfigMap) -> Result<Option<f64>> {
        let storage_gb = config_f64(config, "storage_gb", 50.0);
        let conn = self.connect()?;
        let notes: Option<String> = conn
            .query_row(
                "SELECT notes FROM managed_services WHERE provider_id = ?1 AND service = ?2",
                params![provider, service],
                |r| r.get(0),
            )
            .optional()
            .map_err(CatalogIoError::Query)?;
        let per_gb = notes
            .and_then(|n| serde_json::from_str::<serde_json::Value>(&n).ok())
            .and_then(|v| {
                v.get("per_gb_month")
                    .or_else(|| v.get("standard_per_gb"))
                    .and_then(|x| x.as_f64())
            })
            .unwrap_or(0.023);
        Ok(Some((storage_gb * per_gb * 100.0).round() / 100.0))
    }

    fn price_load_balancer(&self, service: &str, provider: &str, config: &ConfigMap) -> Result<Option<f64>> {
        let conn = self.connect()?;
        let row: Option<f64> = conn
            .query_row(
                "SELECT price_per_month FROM managed_services WHERE provider_id = ?1 AND service = ?2",
                params![provider, service],
                |r| r.get(0),
            )
            .optional()
            .map_err(CatalogIoError::Query)?;
        match row {
            Some(monthly) if monthly > 0.0 => Ok(Some((monthly * 100.0).round() / 100.0)),
            _ => Ok(Some(crate::formula::default_managed_price(service, config))),
        }
    }

    fn price_cdn(&self, service: &str, provider: &str, config: &ConfigMap) -> Result<Option<f64>> {
        let estimated_gb = config_f64(config, "estimated_gb", 100.0);
        let conn = self.connect()?;
        let notes: Option<String> = conn
            .query_row(
                "SELECT notes FROM managed_services WHERE provider_id = ?1 AND service = ?2",
                params![provider, service],
                |r| r.get(0),
            )
            .optional()
            .map_err(CatalogIoError::Query)?;
        let rate = notes
            .and_then(|n| serde_json::from_str::<serde_json::Value>(&n).ok())
            .and_then(|v| {
                if let Some(transfer) = v.get("data_transfer_out_per_gb") {
                    if let Some(obj) = transfer.as_object() {
                        return obj.get("first_10tb").and_then(|x| x.as_f64());
                    }
                    return transfer.as_f64();
                }
                v.get("per_gb").and_then(|x| x.as_f64())
            })
            .unwrap_or(0.085);
        Ok(Some((estimated_gb * rate * 100.0).round() / 100.0))
    }

    fn price_cache(&self, service: &str, provider: &str, config: &ConfigMap) -> Result<Option<f64>> {
        let node_type = config_str(config, &["node_type", "tier"]);
        if let Some(node_type) = node_type {
            if !node_type.is_empty() {
                let conn = self.connect()?;
                let hourly: Option<f64> = conn
                    .query_row(
                        "SELECT price_per_hour FROM managed_services WHERE provider_id = ?1 AND tier_name = ?2",
                        params![provider, node_type],
                        |r| r.get(0),
                    )
                    .optional()
                    .map_err(CatalogIoError::Query)?;
                if let Some(hourly) = hourly {
                    return Ok(Some((hourly * 730.0 * 100.0).round() / 100.0));
                }
            }
        }
        Ok(Some(crate::formula::default_managed_price(service, config)))
    }

    fn price_serverless(config: &ConfigMap) -> f64 {
        let monthly_requests = config_f64(config, "monthly_requests", 1_000_000.0);
        let avg_duration_ms = config_f64(config, "avg_duration_ms", 200.0);
        let memory_mb = config_f64(config, "memory_mb", 512.0);
        let request_cost = (monthly_requests / 1_000_000.0) * 0.20;
        let gb_seconds = (monthly_requests * avg_duration_ms / 1000.0) * (memory_mb / 1024.0);
        let compute_cost = gb_seconds * 0.0000166667;
        ((request_cost + compute_cost) * 100.0).round() / 100.0
    }

    /// Populates `service_definitions`/`service_equivalences` from a
    /// [`ServiceRegistry`]. Idempotent: `INSERT OR REPLACE` / `INSERT OR
    /// IGNORE` so repeated calls leave row counts unchanged.
    pub fn sync_from_registry(&self, registry: &ServiceRegistry) -> Result<()> {
        let _guard = self.write_lock.lock();
        let conn = self.connect()?;
        self.sync_registry_conn(&conn, registry)
    }

    fn sync_registry_conn(&self, conn: &Connection, registry: &ServiceRegistry) -> Result<()> {
        for provider in registry.list_providers() {
            for svc in registry.list_services(provider) {
                let sid = format!("{}:{}", svc.provider, svc.service_key);
                let default_config = serde_json::to_string(&svc.default_config).unwrap_or_else(|_| "{}".to_string());
                conn.execute(
                    "INSERT OR REPLACE INTO service_definitions
                     (id, provider_id, service_key, category, name, pricing_formula, default_config)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![sid, svc.provider, svc.service_key, svc.category, svc.name, svc.pricing_formula, default_config],
                )
                .map_err(CatalogIoError::Seed)?;
            }
        }

        for equiv in registry.all_equivalences() {
            let providers: Vec<&String> = equiv.keys().collect();
            for (i, pa) in providers.iter().enumerate() {
                for pb in &providers[i + 1..] {
                    conn.execute(
                        "INSERT OR IGNORE INTO service_equivalences
                         (service_a, provider_a, service_b, provider_b) VALUES (?1, ?2, ?3, ?4)",
                        params![equiv[*pa], pa, equiv[*pb], pb],
                    )
                    .map_err(CatalogIoError::Seed)?;
                }
            }
        }
        Ok(())
    }

    /// Maps an instance name across providers via the `equivalences` table,
    /// trying both directions. Returns `None` when no row links the two.
    pub fn equivalent_instance(&self, instance_name: &str, from_provider: &str, to_provider: &str) -> Result<Option<String>> {
        let src_id = format!("{from_provider}:{instance_name}");
        let conn = self.connect()?;
        let to_prefix = format!("{to_provider}:%");
        let row: Option<String> = conn
            .query_row(
                "SELECT CASE WHEN instance_a_id = ?1 THEN instance_b_id ELSE instance_a_id END
                 FROM equivalences
                 WHERE (instance_a_id = ?1 OR instance_b_id = ?1)
                 AND (instance_a_id LIKE ?2 OR instance_b_id LIKE ?2)",
                params![src_id, to_prefix],
                |r| r.get(0),
            )
            .optional()
            .map_err(CatalogIoError::Query)?;
        Ok(row.map(|equiv_id| {
            equiv_id
                .split_once(':')
                .map(|(_, name)| name.to_string())
                .unwrap_or(equiv_id)
        }))
    }

    pub fn get_stats(&self) -> Result<CatalogStats> {
        let conn = self.connect()?;
        let instance_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM instance_types", [], |r| r.get(0))
            .map_err(CatalogIoError::Query)?;
        let pricing_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM pricing", [], |r| r.get(0))
            .map_err(CatalogIoError::Query)?;
        let managed_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM managed_services", [], |r| r.get(0))
            .map_err(CatalogIoError::Query)?;
        let equivalence_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM service_equivalences", [], |r| r.get(0))
            .map_err(CatalogIoError::Query)?;
        Ok(CatalogStats {
            instance_count,
            pricing_count,
            managed_count,
            equivalence_count,
        })
    }

    /// Looks up the normalized region bucket and display name for a
    /// provider/region-code pair, falling back to `("us_east", code)` for a
    /// region the bundled seed data doesn't know about (the refresh
    /// pipeline may be pointed at a region never shipped in `REGION_MAP`).
    pub fn region_info(provider: &str, code: &str) -> (&'static str, String) {
        REGION_MAP
            .iter()
            .find(|(p, _)| *p == provider)
            .and_then(|(_, regions)| regions.iter().find(|(c, _, _)| *c == code))
            .map(|(_, normalized, name)| (*normalized, name.to_string()))
            .unwrap_or(("us_east", code.to_string()))
    }

    /// Upserts one instance type and its on-demand price for a region,
    /// used by the Catalog Refresh Pipeline to write adapter-fetched
    /// pricing. Idempotent: `INSERT OR REPLACE` on both rows.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_instance_price(
        &self,
        provider: &str,
        instance_type: &str,
        vcpus: i64,
        memory_gb: f64,
        storage_desc: &str,
        network_bandwidth: &str,
        region: &str,
        os: &str,
        price_per_hour: f64,
        price_type: &str,
    ) -> Result<()> {
        let _guard = self.write_lock.lock();
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR IGNORE INTO providers (id, name) VALUES (?1, ?2)",
            params![provider, provider.to_uppercase()],
        )
        .map_err(CatalogIoError::Query)?;

        let (normalized, region_name) = Self::region_info(provider, region);
        let region_id = format!("{provider}:{region}");
        conn.execute(
            "INSERT OR IGNORE INTO regions (id, provider_id, code, name, normalized) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![region_id, provider, region, region_name, normalized],
        )
        .map_err(CatalogIoError::Query)?;

        let inst_id = format!("{provider}:{instance_type}");
        conn.execute(
            "INSERT OR REPLACE INTO instance_types
             (id, provider_id, name, vcpus, memory_gb, storage_desc, network_bandwidth, arch)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'x86_64')",
            params![inst_id, provider, instance_type, vcpus, memory_gb, storage_desc, network_bandwidth],
        )
        .map_err(CatalogIoError::Query)?;

        conn.execute(
            "INSERT OR REPLACE INTO pricing (instance_type_id, region_id, os, price_per_hour, price_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![inst_id, region_id, os, price_per_hour, price_type],
        )
        .map_err(CatalogIoError::Query)?;

        Ok(())
    }

    /// Upserts one managed-service pricing tier, used by the Catalog
    /// Refresh Pipeline.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_managed_service(
        &self,
        provider: &str,
        service: &str,
        tier_name: &str,
        price_per_hour: f64,
        price_per_month: f64,
        vcpus: i64,
        memory_gb: f64,
        notes: &str,
    ) -> Result<()> {
        let _guard = self.write_lock.lock();
        let conn = self.connect()?;
        let tier_id = format!("{provider}:{service}:{tier_name}");
        conn.execute(
            "INSERT OR REPLACE INTO managed_services
             (id, provider_id, service, tier_name, price_per_hour, price_per_month, vcpus, memory_gb, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![tier_id, provider, service, tier_name, price_per_hour, price_per_month, vcpus, memory_gb, notes],
        )
        .map_err(CatalogIoError::Query)?;
        Ok(())
    }

    /// Records a `catalog_metadata` row tagged with the current UTC
    /// timestamp, used by the refresh pipeline to mark what was last
    /// refreshed and when.
    pub fn record_metadata(&self, key: &str, value: &str, updated_at: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO catalog_metadata (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, updated_at],
        )
        .map_err(CatalogIoError::Query)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub instance_count: i64,
    pub pricing_count: i64,
    pub managed_count: i64,
    pub equivalence_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::Value;

    fn temp_catalog() -> (Catalog, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        (Catalog::open(path).unwrap(), dir)
    }

    #[test]
    fn seeds_on_first_open() {
        let (catalog, _dir) = temp_catalog();
        let stats = catalog.get_stats().unwrap();
        assert!(stats.instance_count > 0);
        assert!(stats.pricing_count > 0);
    }

    #[test]
    fn find_instance_resolves_bare_name() {
        let (catalog, _dir) = temp_catalog();
        let row = catalog.find_instance("m5.large").unwrap().unwrap();
        assert_eq!(row.provider, "aws");
        assert!(row.price_per_hour.unwrap() > 0.0);
    }

    #[test]
    fn search_sorts_by_price_ascending() {
        let (catalog, _dir) = temp_catalog();
        let rows = catalog
            .search(&SearchQuery {
                provider: Some("aws".to_string()),
                limit: 10,
                ..SearchQuery::new()
            })
            .unwrap();
        assert!(!rows.is_empty());
        let prices: Vec<f64> = rows.iter().filter_map(|r| r.price_per_hour).collect();
        let mut sorted = prices.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(prices, sorted);
    }

    #[test]
    fn compare_tries_provider_prefixes() {
        let (catalog, _dir) = temp_catalog();
        let rows = catalog.compare(&["m5.large", "n2-standard-2"]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn get_service_pricing_ec2_uses_instance_lookup() {
        let (catalog, _dir) = temp_catalog();
        let mut config = ConfigMap::new();
        config.insert("instance_type".to_string(), Value::String("m5.large".to_string()));
        config.insert("count".to_string(), Value::Number(2.0));
        let monthly = catalog
            .get_service_pricing("ec2", "aws", &config, "on_demand")
            .unwrap()
            .unwrap();
        assert!(monthly > 0.0);
    }

    #[test]
    fn get_service_pricing_unknown_service_returns_none() {
        let (catalog, _dir) = temp_catalog();
        let config = ConfigMap::new();
        assert_eq!(
            catalog.get_service_pricing("not_a_service", "aws", &config, "on_demand").unwrap(),
            None
        );
    }

    #[test]
    fn sync_from_registry_is_idempotent() {
        let (catalog, _dir) = temp_catalog();
        let registry = ServiceRegistry::load_embedded().unwrap();
        catalog.sync_from_registry(&registry).unwrap();
        let before = catalog.get_stats().unwrap();
        catalog.sync_from_registry(&registry).unwrap();
        let after = catalog.get_stats().unwrap();
        assert_eq!(before.equivalence_count, after.equivalence_count);
    }

    #[test]
    fn equivalent_instance_resolves_both_directions() {
        let (catalog, _dir) = temp_catalog();
        let gcp_name = catalog.equivalent_instance("m5.large", "aws", "gcp").unwrap();
        assert_eq!(gcp_name.as_deref(), Some("n2-standard-2"));
        let aws_name = catalog.equivalent_instance("n2-standard-2", "gcp", "aws").unwrap();
        assert_eq!(aws_name.as_deref(), Some("m5.large"));
    }
}
