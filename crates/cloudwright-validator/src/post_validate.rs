use cloudwright_spec::{ArchSpec, Value};

use crate::helpers::config_truthy;
use crate::service_sets::{COMPUTE_SERVICES, DATABASE_SERVICES, POST_VALIDATE_DATA_STORE_SERVICES};

/// Applies safe-default hardening to every component: encryption + backup on
/// data stores, multi_az on databases once the architecture has grown past a
/// handful of components, auto_scaling on compute. Idempotent — running it
/// twice produces the same spec as running it once.
pub fn post_validate(spec: &ArchSpec) -> ArchSpec {
    let multi_component = spec.components.len() > 3;
    let mut changed = false;
    let mut components = spec.components.clone();

    for comp in &mut components {
        if POST_VALIDATE_DATA_STORE_SERVICES.contains(&comp.service.as_str()) {
            if !config_truthy(comp, "encryption") {
                comp.config.insert("encryption".into(), Value::Bool(true));
                changed = true;
            }
            if !config_truthy(comp, "backup") {
                comp.config.insert("backup".into(), Value::Bool(true));
                changed = true;
            }
        }

        if DATABASE_SERVICES.contains(&comp.service.as_str()) && multi_component && !config_truthy(comp, "multi_az") {
            comp.config.insert("multi_az".into(), Value::Bool(true));
            changed = true;
        }

        if COMPUTE_SERVICES.contains(&comp.service.as_str()) && !config_truthy(comp, "auto_scaling") {
            comp.config.insert("auto_scaling".into(), Value::Bool(true));
            changed = true;
        }
    }

    if let (Some(constraints), Some(estimate)) = (&spec.constraints, &spec.cost_estimate) {
        if let Some(budget) = constraints.budget_monthly {
            if estimate.monthly_total > budget {
                tracing::warn!(
                    monthly_total = estimate.monthly_total,
                    budget_monthly = budget,
                    "architecture cost exceeds budget limit"
                );
            }
        }
    }

    if !changed {
        return spec.clone();
    }

    let mut updated = spec.clone();
    updated.components = components;
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwright_spec::{Component, Provider};

    fn spec_with(services: &[&str]) -> ArchSpec {
        let mut spec = ArchSpec::new("demo", Provider::Aws, "us-east-1");
        for (i, svc) in services.iter().enumerate() {
            spec.components.push(Component {
                id: format!("c{i}"),
                service: svc.to_string(),
                provider: Provider::Aws,
                label: None,
                description: String::new(),
                tier: 2,
                config: Default::default(),
            });
        }
        spec
    }

    #[test]
    fn hardens_data_store_and_compute() {
        let spec = spec_with(&["rds", "ec2"]);
        let hardened = post_validate(&spec);
        let db = hardened.component("c0").unwrap();
        assert_eq!(db.config_bool("encryption"), Some(true));
        assert_eq!(db.config_bool("backup"), Some(true));
        let web = hardened.component("c1").unwrap();
        assert_eq!(web.config_bool("auto_scaling"), Some(true));
    }

    #[test]
    fn multi_az_only_applied_past_three_components() {
        let small = spec_with(&["rds"]);
        let hardened_small = post_validate(&small);
        assert_eq!(hardened_small.component("c0").unwrap().config_bool("multi_az"), None);

        let large = spec_with(&["rds", "ec2", "s3", "alb"]);
        let hardened_large = post_validate(&large);
        assert_eq!(hardened_large.component("c0").unwrap().config_bool("multi_az"), Some(true));
    }

    #[test]
    fn is_idempotent() {
        let spec = spec_with(&["rds", "ec2", "s3", "alb"]);
        let once = post_validate(&spec);
        let twice = post_validate(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn leaves_already_hardened_config_alone() {
        let mut spec = spec_with(&["rds"]);
        spec.components[0].config.insert("encryption".into(), Value::Bool(true));
        spec.components[0].config.insert("backup".into(), Value::Bool(true));
        let hardened = post_validate(&spec);
        assert_eq!(hardened, spec);
    }
}
