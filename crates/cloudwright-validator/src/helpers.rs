use std::collections::HashSet;

use cloudwright_spec::{ArchSpec, Component, Value};

use crate::service_sets::{DATA_STORE_SERVICES, STORAGE_SERVICES};

pub fn services(spec: &ArchSpec) -> HashSet<&str> {
    spec.components.iter().map(|c| c.service.as_str()).collect()
}

/// True if all connections use HTTPS/TLS, or no connections exist.
pub fn encrypted_in_transit(spec: &ArchSpec) -> bool {
    if spec.connections.is_empty() {
        return true;
    }
    !spec.connections.iter().any(|conn| {
        matches!(
            conn.protocol.as_deref().map(str::to_ascii_uppercase).as_deref(),
            Some("HTTP") | Some("PLAIN") | Some("FTP")
        )
    })
}

/// Component ids of data stores (databases + object storage) lacking
/// `encryption=true`.
/// Mirrors Python's truthiness for a config value: present and not
/// `false`/`null`/empty string/empty list/empty map.
pub fn config_truthy(comp: &Component, key: &str) -> bool {
    match comp.config.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::List(l)) => !l.is_empty(),
        Some(Value::Map(m)) => !m.is_empty(),
        Some(Value::Number(n)) => *n != 0.0,
    }
}

pub fn unencrypted_stores(spec: &ArchSpec) -> Vec<&str> {
    spec.components
        .iter()
        .filter(|c| DATA_STORE_SERVICES.contains(&c.service.as_str()) || STORAGE_SERVICES.contains(&c.service.as_str()))
        .filter(|c| c.config_bool("encryption") != Some(true))
        .map(|c| c.id.as_str())
        .collect()
}
