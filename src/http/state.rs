//! Application state for the HTTP server.

use std::sync::Arc;

use crate::client::{DonkiClient, NoaaClient};
use crate::config::AppConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub donki: DonkiClient,
    pub noaa: NoaaClient,
}

impl AppState {
    /// Build the state from configuration, sharing one HTTP connection
    /// pool between both upstream clients.
    pub fn new(config: AppConfig) -> Self {
        let http = reqwest::Client::new();
        let donki = DonkiClient::new(http.clone(), &config.upstream);
        let noaa = NoaaClient::new(http, &config.upstream);
        Self {
            config: Arc::new(config),
            donki,
            noaa,
        }
    }
}
