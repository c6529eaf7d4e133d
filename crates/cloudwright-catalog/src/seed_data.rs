/// Bundled catalog seed data, embedded at compile time. Loaded into the
/// store on first open when `instance_types` is empty.
pub(crate) const COMPUTE: &[(&str, &str)] = &[
    ("aws", include_str!("../data/aws/compute.json")),
    ("gcp", include_str!("../data/gcp/compute.json")),
    ("azure", include_str!("../data/azure/compute.json")),
];

pub(crate) const DATABASE: &[(&str, &str)] = &[
    ("aws", include_str!("../data/aws/database.json")),
    ("gcp", include_str!("../data/gcp/database.json")),
    ("azure", include_str!("../data/azure/database.json")),
];

pub(crate) const NETWORKING: &[(&str, &str)] = &[
    ("aws", include_str!("../data/aws/networking.json")),
    ("gcp", include_str!("../data/gcp/networking.json")),
    ("azure", include_str!("../data/azure/networking.json")),
];

pub(crate) const STORAGE: &[(&str, &str)] = &[
    ("aws", include_str!("../data/aws/storage.json")),
    ("gcp", include_str!("../data/gcp/storage.json")),
    ("azure", include_str!("../data/azure/storage.json")),
];

pub(crate) const EQUIVALENCES: &str = include_str!("../data/equivalences.json");
