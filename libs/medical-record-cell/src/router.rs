use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::state::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn medical_record_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_record))
        .route("/patient/{patient_id}", get(handlers::list_records_for_patient))
        .route(
            "/{record_id}",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
