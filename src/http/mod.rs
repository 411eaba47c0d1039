//! HTTP server exposing the event feeds and reports as a REST API.
//!
//! The handlers fetch the raw batches from the upstream clients, run
//! the service layer over them and serialize the results; no state
//! survives a request. Everything here is gated behind the
//! `http-server` feature so the core library builds without the axum
//! stack.

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
