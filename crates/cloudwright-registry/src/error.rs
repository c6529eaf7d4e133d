use thiserror::Error;

/// YAML parse failure at load time aborts startup, per the registry's
/// failure semantics.
#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error("failed to parse registry file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to read registry directory {0}: {1}")]
    Io(String, std::io::Error),
}
