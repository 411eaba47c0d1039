//! # Space Weather Analysis Backend
//!
//! Event-correlation engine over the public space weather feeds. The
//! crate fetches solar flares and coronal mass ejections from NASA
//! DONKI and sunspot/region observations from NOAA SWPC, joins them in
//! time and by active region, and scores each pairing with a confidence
//! level and a surprise factor that flags anomalous flare/CME
//! combinations.
//!
//! ## Architecture
//!
//! - [`models`]: Upstream event entities and request value types
//! - [`config`]: TOML configuration with tunable analysis thresholds
//! - [`client`]: Async clients for the DONKI and NOAA feeds
//! - [`services`]: Correlation, scoring, querying and reporting (pure,
//!   no I/O)
//! - [`http`]: Axum-based REST API (behind the `http-server` feature)
//!
//! The service layer never performs I/O: handlers fetch complete
//! batches up front and hand them to synchronous analysis code, which
//! keeps the interesting logic unit-testable with in-memory fixtures.

pub mod client;
pub mod config;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
