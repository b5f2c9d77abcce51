use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::state::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn assistant_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/mental-health", post(handlers::mental_health_chat))
        .route("/history", get(handlers::history))
        .route("/history/{interaction_id}", get(handlers::get_interaction))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
