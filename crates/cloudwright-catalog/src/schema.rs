pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS providers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS regions (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    normalized TEXT NOT NULL,
    UNIQUE(provider_id, code)
);

CREATE TABLE IF NOT EXISTS instance_types (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL,
    name TEXT NOT NULL,
    family TEXT,
    family_normalized TEXT,
    vcpus INTEGER NOT NULL,
    memory_gb REAL NOT NULL,
    storage_desc TEXT,
    gpu_count INTEGER DEFAULT 0,
    network_bandwidth TEXT,
    arch TEXT DEFAULT 'x86_64',
    generation TEXT,
    description TEXT
);

CREATE TABLE IF NOT EXISTS pricing (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    instance_type_id TEXT NOT NULL,
    region_id TEXT NOT NULL,
    os TEXT NOT NULL DEFAULT 'linux',
    price_per_hour REAL NOT NULL,
    price_type TEXT NOT NULL DEFAULT 'on_demand',
    UNIQUE(instance_type_id, region_id, os, price_type)
);

CREATE TABLE IF NOT EXISTS equivalences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    instance_a_id TEXT NOT NULL,
    instance_b_id TEXT NOT NULL,
    confidence REAL NOT NULL DEFAULT 0.8,
    match_type TEXT NOT NULL DEFAULT 'spec',
    UNIQUE(instance_a_id, instance_b_id)
);

CREATE TABLE IF NOT EXISTS managed_services (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL,
    service TEXT NOT NULL,
    tier_name TEXT NOT NULL,
    price_per_hour REAL NOT NULL DEFAULT 0,
    price_per_month REAL NOT NULL DEFAULT 0,
    vcpus INTEGER DEFAULT 0,
    memory_gb REAL DEFAULT 0,
    notes TEXT DEFAULT ''
);

CREATE TABLE IF NOT EXISTS catalog_metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS service_definitions (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL,
    service_key TEXT NOT NULL,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    pricing_formula TEXT NOT NULL DEFAULT 'per_hour',
    default_config TEXT DEFAULT '{}',
    UNIQUE(provider_id, service_key)
);

CREATE TABLE IF NOT EXISTS service_equivalences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    service_a TEXT NOT NULL,
    provider_a TEXT NOT NULL,
    service_b TEXT NOT NULL,
    provider_b TEXT NOT NULL,
    UNIQUE(service_a, provider_a, service_b, provider_b)
);

CREATE INDEX IF NOT EXISTS idx_instance_provider ON instance_types(provider_id);
CREATE INDEX IF NOT EXISTS idx_instance_vcpus ON instance_types(vcpus);
CREATE INDEX IF NOT EXISTS idx_instance_memory ON instance_types(memory_gb);
CREATE INDEX IF NOT EXISTS idx_pricing_instance ON pricing(instance_type_id);
CREATE INDEX IF NOT EXISTS idx_pricing_region ON pricing(region_id);
CREATE INDEX IF NOT EXISTS idx_managed_service ON managed_services(provider_id, service);
"#;

/// Top-level keys expected in each provider's `networking.json` seed file.
pub(crate) const NETWORKING_KEYS: &[&str] =
    &["alb", "nlb", "cloudfront", "route53", "api_gateway", "cloud_load_balancing", "cloud_cdn", "cloud_dns", "app_gateway", "azure_lb", "azure_cdn", "azure_dns"];

/// Top-level keys expected in each provider's `storage.json` seed file.
pub(crate) const STORAGE_KEYS: &[&str] = &["s3", "ebs", "cloud_storage", "persistent_disk", "blob_storage", "managed_disks"];

pub(crate) const PROVIDERS: &[(&str, &str)] = &[
    ("aws", "Amazon Web Services"),
    ("gcp", "Google Cloud"),
    ("azure", "Microsoft Azure"),
];

/// `provider -> [(region code, normalized bucket, display name)]`.
pub(crate) const REGION_MAP: &[(&str, &[(&str, &str, &str)])] = &[
    (
        "aws",
        &[
            ("us-east-1", "us_east", "US East (Virginia)"),
            ("us-west-2", "us_west", "US West (Oregon)"),
            ("eu-west-1", "eu_west", "EU (Ireland)"),
            ("ap-southeast-1", "ap_southeast", "Asia Pacific (Singapore)"),
        ],
    ),
    (
        "gcp",
        &[
            ("us-central1", "us_east", "US Central (Iowa)"),
            ("us-west1", "us_west", "US West (Oregon)"),
            ("europe-west1", "eu_west", "EU (Belgium)"),
            ("asia-southeast1", "ap_southeast", "Asia SE (Singapore)"),
        ],
    ),
    (
        "azure",
        &[
            ("eastus", "us_east", "East US"),
            ("westus2", "us_west", "West US 2"),
            ("westeurope", "eu_west", "West Europe"),
            ("southeastasia", "ap_southeast", "Southeast Asia"),
        ],
    ),
];
