//! Structural diff between two [`ArchSpec`] versions: which components and
//! connections were added, removed, or changed, plus the resulting cost
//! delta.

use cloudwright_spec::{ArchSpec, ChangeKind, Component, ConnectionChange, DiffResult, FieldChange, Value};

/// Computes the structural delta from `old` to `new`.
///
/// Components are matched by id; connections by the `(source, target)` pair.
/// `added`/`removed` are sorted by component id; `changed` is sorted by
/// `(component_id, field)`.
pub fn diff(old: &ArchSpec, new: &ArchSpec) -> DiffResult {
    let mut added: Vec<Component> = new
        .components
        .iter()
        .filter(|c| old.component(&c.id).is_none())
        .cloned()
        .collect();
    added.sort_by(|a, b| a.id.cmp(&b.id));

    let mut removed: Vec<Component> = old
        .components
        .iter()
        .filter(|c| new.component(&c.id).is_none())
        .cloned()
        .collect();
    removed.sort_by(|a, b| a.id.cmp(&b.id));

    let mut changed: Vec<FieldChange> = Vec::new();
    for old_comp in &old.components {
        if let Some(new_comp) = new.component(&old_comp.id) {
            changed.extend(component_field_changes(old_comp, new_comp));
        }
    }
    changed.sort_by(|a, b| (a.component_id.as_str(), a.field.as_str()).cmp(&(b.component_id.as_str(), b.field.as_str())));

    let connection_changes = diff_connections(old, new);

    let cost_delta = match (&old.cost_estimate, &new.cost_estimate) {
        (Some(o), Some(n)) => n.monthly_total - o.monthly_total,
        _ => 0.0,
    };

    let summary = format!(
        "Added {}, Removed {}, Changed {} components",
        added.len(),
        removed.len(),
        changed.len()
    );

    DiffResult {
        added,
        removed,
        changed,
        connection_changes,
        cost_delta,
        summary,
    }
}

fn component_field_changes(old: &Component, new: &Component) -> Vec<FieldChange> {
    let mut out = Vec::new();
    let mut push = |field: &str, old_value: Value, new_value: Value| {
        if old_value != new_value {
            out.push(FieldChange {
                component_id: old.id.clone(),
                field: field.to_string(),
                old_value,
                new_value,
            });
        }
    };

    push("service", Value::String(old.service.clone()), Value::String(new.service.clone()));
    push(
        "provider",
        Value::String(old.provider.to_string()),
        Value::String(new.provider.to_string()),
    );
    push(
        "label",
        old.label.clone().map(Value::String).unwrap_or(Value::Null),
        new.label.clone().map(Value::String).unwrap_or(Value::Null),
    );
    push(
        "description",
        Value::String(old.description.clone()),
        Value::String(new.description.clone()),
    );
    push("tier", Value::Number(old.tier as f64), Value::Number(new.tier as f64));

    let mut keys: Vec<&String> = old.config.keys().chain(new.config.keys()).collect();
    keys.sort();
    keys.dedup();
    for key in keys {
        let old_value = old.config.get(key).cloned().unwrap_or(Value::Null);
        let new_value = new.config.get(key).cloned().unwrap_or(Value::Null);
        push(&format!("config.{key}"), old_value, new_value);
    }

    out
}

fn diff_connections(old: &ArchSpec, new: &ArchSpec) -> Vec<ConnectionChange> {
    let mut out = Vec::new();

    for conn in &new.connections {
        if !old
            .connections
            .iter()
            .any(|c| c.source == conn.source && c.target == conn.target)
        {
            out.push(ConnectionChange {
                kind: ChangeKind::Added,
                source: conn.source.clone(),
                target: conn.target.clone(),
                detail: None,
            });
        }
    }

    for conn in &old.connections {
        if !new
            .connections
            .iter()
            .any(|c| c.source == conn.source && c.target == conn.target)
        {
            out.push(ConnectionChange {
                kind: ChangeKind::Removed,
                source: conn.source.clone(),
                target: conn.target.clone(),
                detail: None,
            });
        }
    }

    for old_conn in &old.connections {
        if let Some(new_conn) = new
            .connections
            .iter()
            .find(|c| c.source == old_conn.source && c.target == old_conn.target)
        {
            let mut details = Vec::new();
            if old_conn.label != new_conn.label {
                details.push(format!("label: {:?} -> {:?}", old_conn.label, new_conn.label));
            }
            if old_conn.protocol != new_conn.protocol {
                details.push(format!("protocol: {:?} -> {:?}", old_conn.protocol, new_conn.protocol));
            }
            if old_conn.port != new_conn.port {
                details.push(format!("port: {:?} -> {:?}", old_conn.port, new_conn.port));
            }
            if !details.is_empty() {
                out.push(ConnectionChange {
                    kind: ChangeKind::Changed,
                    source: old_conn.source.clone(),
                    target: old_conn.target.clone(),
                    detail: Some(details.join(", ")),
                });
            }
        }
    }

    out.sort_by(|a, b| (a.source.as_str(), a.target.as_str(), a.kind as u8).cmp(&(b.source.as_str(), b.target.as_str(), b.kind as u8)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::{Connection, CostEstimate, Provider};

    fn base_spec() -> ArchSpec {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        spec.components.push(Component {
            id: "web".into(),
            service: "ec2".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 2,
            config: Default::default(),
        });
        spec.components.push(Component {
            id: "db".into(),
            service: "rds".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 3,
            config: [("encryption".to_string(), Value::Bool(false))].into_iter().collect(),
        });
        spec.connections.push(Connection {
            source: "web".into(),
            target: "db".into(),
            label: String::new(),
            protocol: Some("HTTP".into()),
            port: Some(5432),
            estimated_monthly_gb: None,
        });
        spec
    }

    #[test]
    fn detects_added_and_removed_components() {
        let old = base_spec();
        let mut new = base_spec();
        new.components.retain(|c| c.id != "web");
        new.components.push(Component {
            id: "cache".into(),
            service: "elasticache".into(),
            provider: Provider::Aws,
            label: None,
            description: String::new(),
            tier: 3,
            config: Default::default(),
        });

        let result = diff(&old, &new);
        assert_eq!(result.added.len(), 1);
        assert_eq!(result.added[0].id, "cache");
        assert_eq!(result.removed.len(), 1);
        assert_eq!(result.removed[0].id, "web");
    }

    #[test]
    fn detects_config_field_changes() {
        let old = base_spec();
        let mut new = base_spec();
        new.components[1].config.insert("encryption".into(), Value::Bool(true));

        let result = diff(&old, &new);
        assert_eq!(result.changed.len(), 1);
        assert_eq!(result.changed[0].field, "config.encryption");
        assert_eq!(result.changed[0].component_id, "db");
    }

    #[test]
    fn detects_connection_protocol_change() {
        let old = base_spec();
        let mut new = base_spec();
        new.connections[0].protocol = Some("TLS".into());

        let result = diff(&old, &new);
        assert_eq!(result.connection_changes.len(), 1);
        assert_eq!(result.connection_changes[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn cost_delta_is_zero_without_estimates() {
        let result = diff(&base_spec(), &base_spec());
        assert_eq!(result.cost_delta, 0.0);
    }

    #[test]
    fn cost_delta_reflects_estimate_change() {
        let mut old = base_spec();
        old.cost_estimate = Some(CostEstimate {
            monthly_total: 100.0,
            breakdown: Vec::new(),
            data_transfer_monthly: 0.0,
            currency: "USD".into(),
            as_of: "2026-01-01".into(),
        });
        let mut new = base_spec();
        new.cost_estimate = Some(CostEstimate {
            monthly_total: 148.6,
            breakdown: Vec::new(),
            data_transfer_monthly: 0.0,
            currency: "USD".into(),
            as_of: "2026-01-01".into(),
        });

        let result = diff(&old, &new);
        assert!((result.cost_delta - 48.6).abs() < 1e-9);
    }

    #[test]
    fn summary_counts_each_bucket() {
        let old = base_spec();
        let mut new = base_spec();
        new.components.retain(|c| c.id != "web");
        new.components[0].config.insert("encryption".into(), Value::Bool(true));

        let result = diff(&old, &new);
        assert_eq!(result.summary, "Added 0, Removed 1, Changed 1 components");
    }
}
