use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use shared_database::state::AppState;
use shared_utils::extractor::{auth_middleware, require_doctor};

use crate::handlers;

/// Schedule configuration and lookup, mounted at `/availability`. Management
/// routes are doctor-only; the check is open to any authenticated caller.
pub fn availability_routes(state: Arc<AppState>) -> Router {
    let doctor_only_routes = Router::new()
        .route(
            "/specialties",
            get(handlers::get_specialties).post(handlers::set_specialties),
        )
        .route("/hours", get(handlers::get_hours).post(handlers::set_hours))
        .route("/hours/{day}", delete(handlers::delete_hours))
        .layer(middleware::from_fn(require_doctor));

    let check_routes = Router::new().route("/check/{doctor_id}", get(handlers::check_availability));

    Router::new()
        .merge(doctor_only_routes)
        .merge(check_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Doctor directory search, mounted at `/search`.
pub fn search_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/specialty", get(handlers::search_by_specialty))
        .route("/location", get(handlers::search_by_location))
        .route("/filter", get(handlers::search_with_filters))
        .route("/{doctor_id}", get(handlers::get_doctor_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
