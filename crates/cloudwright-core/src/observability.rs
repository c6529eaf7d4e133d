//! Tracing-subscriber initialization, following the teacher's
//! `aion_core::logging::init_logging` pattern: a `LoggingConfig` struct with
//! a `Default` impl, an env-filter built from the configured level plus
//! per-module overrides, and a choice of human-readable or JSON output.
//!
//! Trimmed to the ambient-observability subset a design-time library needs —
//! no correlation-id span injection or sensitive-field redaction, since this
//! crate never logs request bodies or secrets.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Registry;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Human-readable, for local development.
    Pretty,
    /// Structured JSON, for log aggregation.
    Json,
}

/// Logging configuration, following `aion_core::logging::LoggingConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level ("trace" | "debug" | "info" | "warn" | "error").
    pub level: String,
    /// Per-module level overrides, e.g. `{"cloudwright_catalog": "debug"}`.
    pub module_levels: HashMap<String, String>,
    pub format: LogFormat,
    pub with_file: bool,
    pub with_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            module_levels: HashMap::new(),
            format: LogFormat::Pretty,
            with_file: false,
            with_thread_ids: false,
        }
    }
}

/// Installs a global tracing subscriber from `config`. Safe to call once per
/// process; a second call returns an error from `try_init`, which callers
/// (tests, repeated CLI invocations in one process) can ignore.
pub fn init_tracing(config: LoggingConfig) -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();
    filter = filter.add_directive(config.level.parse().unwrap_or_else(|_| LevelFilter::INFO.into()));
    for (module, level) in &config.module_levels {
        let directive = format!("{module}={level}");
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }

    let registry = Registry::default().with(filter);
    let result = match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_thread_ids(config.with_thread_ids);
            registry.with(layer).try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_thread_ids(config.with_thread_ids);
            registry.with(layer).try_init()
        }
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_info_pretty() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
