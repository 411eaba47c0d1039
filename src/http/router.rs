//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression,
//! tracing), and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; the API is read-only and unauthenticated.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Raw event listings
        .route("/events/{kind}", get(handlers::list_events))
        .route("/events/{kind}/group/{field}", get(handlers::group_events))
        // Analysis reports
        .route("/report/flagged", get(handlers::flagged_report))
        .route("/report/sametime", get(handlers::sametime_report))
        .route("/report/regions", get(handlers::regions_report));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
