//! Service-class constants shared across framework checks. Two services
//! sets name data stores: [`DATA_STORE_SERVICES`] plus [`STORAGE_SERVICES`]
//! (databases vs. object storage) cover the compliance checks here, while
//! the post-validation hardening pass in [`crate::post_validate`] uses its
//! own wider [`POST_VALIDATE_DATA_STORE_SERVICES`] that folds object
//! storage in directly — the two were scoped differently upstream and
//! keeping them distinct preserves each check's original behavior.

pub const BAA_ELIGIBLE_AWS: &[&str] = &[
    "ec2", "ecs", "eks", "lambda", "fargate", "rds", "aurora", "dynamodb", "elasticache", "s3", "sqs", "sns",
    "cloudfront", "alb", "nlb", "waf", "cloudwatch", "cloudtrail", "cognito", "iam", "kms", "route53", "api_gateway",
    "redshift", "emr", "sagemaker",
];

pub const BAA_ELIGIBLE_GCP: &[&str] = &[
    "compute_engine", "gke", "cloud_run", "cloud_functions", "cloud_sql", "firestore", "spanner", "cloud_storage",
    "pub_sub", "bigquery", "cloud_load_balancing", "cloud_armor", "cloud_dns", "cloud_cdn", "firebase_auth",
    "vertex_ai", "memorystore", "cloud_logging",
];

pub const BAA_ELIGIBLE_AZURE: &[&str] = &[
    "virtual_machines", "aks", "container_apps", "azure_functions", "app_service", "azure_sql", "cosmos_db",
    "azure_cache", "blob_storage", "service_bus", "event_hubs", "app_gateway", "azure_waf", "azure_lb", "azure_ad",
    "azure_monitor", "synapse", "azure_ml", "azure_cdn", "azure_dns",
];

pub fn baa_eligible(provider: &str) -> &'static [&'static str] {
    match provider {
        "aws" => BAA_ELIGIBLE_AWS,
        "gcp" => BAA_ELIGIBLE_GCP,
        "azure" => BAA_ELIGIBLE_AZURE,
        _ => &[],
    }
}

/// Managed databases — excludes object storage, which PCI-DSS/HIPAA
/// encryption checks fold in separately via [`STORAGE_SERVICES`].
pub const DATA_STORE_SERVICES: &[&str] = &[
    "rds", "aurora", "dynamodb", "elasticache", "redshift", "cloud_sql", "firestore", "spanner", "memorystore",
    "bigquery", "azure_sql", "cosmos_db", "azure_cache", "synapse",
];

pub const STORAGE_SERVICES: &[&str] = &["s3", "cloud_storage", "blob_storage"];

pub const LOGGING_SERVICES: &[&str] = &["cloudwatch", "cloudtrail", "cloud_logging", "azure_monitor"];

pub const AUTH_SERVICES: &[&str] = &["cognito", "iam", "firebase_auth", "azure_ad"];

pub const WAF_SERVICES: &[&str] = &["waf", "cloud_armor", "azure_waf"];

pub const LB_SERVICES: &[&str] = &["alb", "nlb", "cloud_load_balancing", "app_gateway", "azure_lb"];

pub const COMPUTE_SERVICES: &[&str] = &[
    "ec2", "ecs", "eks", "lambda", "fargate", "compute_engine", "gke", "cloud_run", "cloud_functions", "app_engine",
    "virtual_machines", "aks", "container_apps", "azure_functions", "app_service",
];

pub const CICD_SERVICES: &[&str] = &["codepipeline", "codebuild", "cloud_build", "azure_devops"];

/// Services that can raise an incident alert (paging/notification), used
/// by the FedRAMP `incident_response` check.
pub const ALERTING_SERVICES: &[&str] = &["sns", "pub_sub", "event_grid"];

/// Data stores plus object storage, used by the post-validation hardening
/// pass to decide where to force `encryption`/`backup` on. Scoped wider
/// than [`DATA_STORE_SERVICES`] because hardening should cover anything
/// that persists customer data, not just the compliance-check subset.
pub const POST_VALIDATE_DATA_STORE_SERVICES: &[&str] = &[
    "rds", "aurora", "dynamodb", "s3", "elasticache", "redshift", "cloud_sql", "firestore", "spanner", "memorystore",
    "cloud_storage", "bigquery", "azure_sql", "cosmos_db", "azure_cache", "blob_storage", "synapse",
];

/// Databases that support multi-AZ/replication, used by the
/// post-validation pass to decide where to force `multi_az` on.
pub const DATABASE_SERVICES: &[&str] = &[
    "rds", "aurora", "cloud_sql", "azure_sql", "cosmos_db", "spanner", "synapse", "redshift", "bigquery",
];

/// US regions (including GovCloud) authorized under FedRAMP Moderate.
pub fn is_us_region(region: &str) -> bool {
    region.starts_with("us-") || region.starts_with("us-gov-")
}

/// EU regions in scope for GDPR data-residency checks.
pub fn is_eu_region(region: &str) -> bool {
    region.starts_with("eu-")
}
