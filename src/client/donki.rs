//! NASA DONKI client for the `FLR` and `CME` endpoints.

use chrono::{DateTime, Utc};

use crate::config::UpstreamConfig;
use crate::models::{CmeEvent, DateRange, FlareEvent};

use super::{get_text, parse_json, ClientError};

/// Client for the DONKI event feeds. Dates are passed as `yyyy-MM-dd`;
/// DONKI answers an *empty body* (not `[]`) when no events fall in the
/// range, which is treated as an empty batch.
#[derive(Debug, Clone)]
pub struct DonkiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DonkiClient {
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            base_url: config.donki_base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint_url(&self, endpoint: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}{endpoint}?startDate={}&endDate={}&api_key={}",
            self.base_url,
            DateRange::format_bound(start),
            DateRange::format_bound(end),
            self.api_key,
        )
    }

    async fn fetch_events<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.endpoint_url(endpoint, start, end);
        let body = get_text(&self.http, &url).await?;
        if body.trim().is_empty() {
            tracing::debug!(endpoint, "empty body from DONKI, treating as no events");
            return Ok(Vec::new());
        }
        parse_json(&url, &body)
    }

    pub async fn fetch_flares(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FlareEvent>, ClientError> {
        self.fetch_events("FLR", start, end).await
    }

    pub async fn fetch_cmes(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CmeEvent>, ClientError> {
        self.fetch_events("CME", start, end).await
    }
}
