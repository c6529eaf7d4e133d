use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InstancePrice, ManagedServicePrice};

/// A provider-specific pricing feed client. Every fetch is a single
/// best-effort HTTP round trip (30s timeout, no retries); a transport
/// failure is returned to the caller rather than swallowed so the refresh
/// pipeline can record it against this provider.
#[async_trait]
pub trait PricingAdapter: Send + Sync {
    fn provider(&self) -> &'static str;

    /// Fetches on-demand instance prices for `region`.
    async fn fetch_instance_pricing(&self, region: &str) -> Result<Vec<InstancePrice>>;

    /// Fetches pricing tiers for one managed service. Returns an empty
    /// list for a `service` this adapter doesn't recognize.
    async fn fetch_managed_service_pricing(&self, service: &str, region: &str) -> Result<Vec<ManagedServicePrice>>;

    fn supported_managed_services(&self) -> &'static [&'static str];
}
