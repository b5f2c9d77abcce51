use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::state::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn billing_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/plans", get(handlers::list_plans));

    let protected_routes = Router::new()
        .route("/", get(handlers::list_subscriptions))
        .route("/create", post(handlers::create_subscription))
        .route("/{subscription_id}", get(handlers::get_subscription))
        .route("/{subscription_id}/cancel", post(handlers::cancel_subscription))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
