use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::state::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Doctor-scoped patient CRUD, mounted at `/patients`.
pub fn patient_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_patients).post(handlers::create_patient))
        .route(
            "/{patient_id}",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Independent patient credential namespace, mounted at `/patients-auth`.
pub fn patient_auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(handlers::register_patient))
        .route("/login", post(handlers::login_patient))
        .with_state(state)
}
