//! Upstream data clients for the NASA DONKI and NOAA SWPC feeds.

pub mod donki;
pub mod noaa;

pub use donki::DonkiClient;
pub use noaa::NoaaClient;

use thiserror::Error;

/// Failure talking to an upstream feed. The URL is carried so callers
/// can log which provider misbehaved without re-deriving it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// GET a URL and return the body, mapping transport and status
/// failures onto [`ClientError`].
pub(crate) async fn get_text(http: &reqwest::Client, url: &str) -> Result<String, ClientError> {
    tracing::debug!(url = %url, "fetching upstream feed");
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|source| ClientError::Request { url: url.to_string(), source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { url: url.to_string(), status });
    }

    response
        .text()
        .await
        .map_err(|source| ClientError::Request { url: url.to_string(), source })
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    url: &str,
    body: &str,
) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

/// GET a JSON document with full error context.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
) -> Result<T, ClientError> {
    let body = get_text(http, url).await?;
    parse_json(url, &body)
}
