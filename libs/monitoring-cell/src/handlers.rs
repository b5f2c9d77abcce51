use axum::extract::Json;
use chrono::Utc;
use serde_json::{json, Value};

const APPLICATION: &str = "Practia - Healthcare Practice Management API";

/// Liveness probe; no auth, no dependencies touched.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Practia backend is running",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

/// Version probe.
pub async fn status() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "version": env!("CARGO_PKG_VERSION"),
        "application": APPLICATION,
        "timestamp": Utc::now().to_rfc3339()
    }))
}
