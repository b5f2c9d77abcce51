use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::state::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn notification_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_inbox))
        .route("/{notification_id}/read", put(handlers::mark_read))
        .route("/appointment/confirm", post(handlers::send_confirmation))
        .route("/appointment/reminder", post(handlers::send_reminder))
        .route("/appointment/cancel", post(handlers::send_cancellation))
        .route(
            "/doctor/new-appointment",
            post(handlers::send_doctor_new_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
