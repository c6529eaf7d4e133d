use std::time::Duration;

use crate::error::{AdapterError, Result};

const TIMEOUT_SECS: u64 = 30;

/// Builds a client with a 30 second timeout and no retry policy — a single
/// failed request is reported to the caller rather than retried, matching
/// the reference adapters' one-shot `urlopen`.
pub(crate) fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()
        .expect("reqwest client with static config always builds")
}

pub(crate) async fn get_bytes(client: &reqwest::Client, url: &str, accept: &str) -> Result<Vec<u8>> {
    let resp = client
        .get(url)
        .header(reqwest::header::ACCEPT, accept)
        .send()
        .await
        .map_err(|source| {
            if source.is_timeout() {
                AdapterError::Timeout { url: url.to_string(), seconds: TIMEOUT_SECS }
            } else {
                AdapterError::Request { url: url.to_string(), source }
            }
        })?;

    if !resp.status().is_success() {
        return Err(AdapterError::Status { url: url.to_string(), status: resp.status().as_u16() });
    }

    resp.bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|source| AdapterError::Request { url: url.to_string(), source })
}

/// Like [`get_bytes`] but treats HTTP 401/403 as "no data" instead of an
/// error — used by the GCP adapter, which degrades gracefully when no API
/// key is configured rather than failing the whole refresh.
pub(crate) async fn get_bytes_or_unauthorized(client: &reqwest::Client, url: &str, accept: &str) -> Result<Option<Vec<u8>>> {
    match get_bytes(client, url, accept).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(AdapterError::Status { status, .. }) if status == 401 || status == 403 => Ok(None),
        Err(e) => Err(e),
    }
}
