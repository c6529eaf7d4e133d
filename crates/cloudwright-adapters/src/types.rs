/// One instance-type price point, as returned by a provider's pricing feed.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancePrice {
    pub instance_type: String,
    pub region: String,
    pub vcpus: i64,
    pub memory_gb: f64,
    pub price_per_hour: f64,
    pub price_type: String,
    pub os: String,
    pub storage_desc: String,
    pub network_bandwidth: String,
}

/// One managed-service pricing tier (e.g. an RDS instance class, a Lambda
/// per-request rate). Exactly one of `price_per_hour`/`price_per_month` is
/// normally non-zero depending on the billing dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedServicePrice {
    pub service: String,
    pub tier_name: String,
    pub price_per_hour: f64,
    pub price_per_month: f64,
    pub description: String,
    pub vcpus: i64,
    pub memory_gb: f64,
}

impl ManagedServicePrice {
    pub(crate) fn new(service: &str, tier_name: &str, price_per_hour: f64, price_per_month: f64, description: impl Into<String>) -> Self {
        ManagedServicePrice {
            service: service.to_string(),
            tier_name: tier_name.to_string(),
            price_per_hour,
            price_per_month,
            description: description.into(),
            vcpus: 0,
            memory_gb: 0.0,
        }
    }
}
