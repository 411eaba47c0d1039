//! NOAA SWPC client for the sunspot, solar-region and flux feeds.

use crate::config::UpstreamConfig;
use crate::models::{FluxReading, SolarRegion, SunspotObservation};

use super::{get_json, ClientError};

/// Client for the SWPC JSON products. These feeds take no parameters;
/// each serves a fixed trailing window of observations.
#[derive(Debug, Clone)]
pub struct NoaaClient {
    http: reqwest::Client,
    base_url: String,
}

impl NoaaClient {
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            base_url: config.noaa_base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn fetch_sunspots(&self) -> Result<Vec<SunspotObservation>, ClientError> {
        get_json(&self.http, &self.url("json/sunspot_report.json")).await
    }

    pub async fn fetch_solar_regions(&self) -> Result<Vec<SolarRegion>, ClientError> {
        get_json(&self.http, &self.url("json/solar_regions.json")).await
    }

    /// The 10cm flux summary is a single object, not a list.
    pub async fn fetch_flux(&self) -> Result<FluxReading, ClientError> {
        get_json(&self.http, &self.url("products/summary/10cm-flux.json")).await
    }
}
