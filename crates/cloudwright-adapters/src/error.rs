use thiserror::Error;

/// Failure modes for a pricing fetch. Adapters never retry; a single
/// failed request surfaces directly so the refresh pipeline can record it
/// against that provider and move on to the next.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed CSV response from {url}: {source}")]
    Csv {
        url: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, AdapterError>;
