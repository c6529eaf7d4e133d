//! Per-provider pricing adapters: AWS, GCP, and Azure public pricing API
//! clients, normalized to uniform [`InstancePrice`]/[`ManagedServicePrice`]
//! records behind the shared [`PricingAdapter`] trait.

mod adapter;
mod aws;
mod azure;
mod error;
mod gcp;
mod http;
mod types;

pub use adapter::PricingAdapter;
pub use aws::AwsPricingAdapter;
pub use azure::AzurePricingAdapter;
pub use error::{AdapterError, Result};
pub use gcp::GcpPricingAdapter;
pub use types::{InstancePrice, ManagedServicePrice};
