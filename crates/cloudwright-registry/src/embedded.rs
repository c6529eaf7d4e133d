/// Bundled registry category files, embedded at compile time so the
/// registry loads without any filesystem dependency when the caller does
/// not supply an override directory.
pub(crate) const EMBEDDED_CATEGORY_FILES: &[(&str, &str)] = &[
    ("analytics.yaml", include_str!("../data/registry/analytics.yaml")),
    ("cache.yaml", include_str!("../data/registry/cache.yaml")),
    ("cicd.yaml", include_str!("../data/registry/cicd.yaml")),
    ("compute.yaml", include_str!("../data/registry/compute.yaml")),
    (
        "database_nosql.yaml",
        include_str!("../data/registry/database_nosql.yaml"),
    ),
    (
        "database_relational.yaml",
        include_str!("../data/registry/database_relational.yaml"),
    ),
    ("messaging.yaml", include_str!("../data/registry/messaging.yaml")),
    ("monitoring.yaml", include_str!("../data/registry/monitoring.yaml")),
    ("networking.yaml", include_str!("../data/registry/networking.yaml")),
    (
        "orchestration.yaml",
        include_str!("../data/registry/orchestration.yaml"),
    ),
    ("security.yaml", include_str!("../data/registry/security.yaml")),
    (
        "serverless.yaml",
        include_str!("../data/registry/serverless.yaml"),
    ),
    ("streaming.yaml", include_str!("../data/registry/streaming.yaml")),
    (
        "storage_object.yaml",
        include_str!("../data/registry/storage_object.yaml"),
    ),
];
