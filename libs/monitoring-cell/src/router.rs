use axum::{routing::get, Router};

use crate::handlers;

/// Probe routes; mounted outside the authenticated API surface.
pub fn monitoring_routes() -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/v1/status", get(handlers::status))
}
