use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use assistant_cell::router::assistant_routes;
use auth_cell::router::auth_routes;
use billing_cell::router::billing_routes;
use doctor_cell::router::{availability_routes, search_routes};
use medical_record_cell::router::medical_record_routes;
use monitoring_cell::router::monitoring_routes;
use notification_cell::router::notification_routes;
use patient_cell::router::{patient_auth_routes, patient_routes};
use shared_database::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_v1 = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/patients-auth", patient_auth_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/medical-records", medical_record_routes(state.clone()))
        .nest("/availability", availability_routes(state.clone()))
        .nest("/search", search_routes(state.clone()))
        .nest("/gpt", assistant_routes(state.clone()))
        .nest("/subscriptions", billing_routes(state.clone()))
        .nest("/notifications", notification_routes(state));

    Router::new()
        .route("/", get(|| async { "Practia API is running!" }))
        .merge(monitoring_routes())
        .nest("/api/v1", api_v1)
}
