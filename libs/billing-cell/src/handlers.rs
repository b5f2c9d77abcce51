use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::state::AppState;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{CancelSubscriptionRequest, CreateSubscriptionRequest};
use crate::plans;
use crate::services::BillingService;

#[axum::debug_handler]
pub async fn list_plans() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::new(json!({ "plans": plans::all_plans() })))
}

#[axum::debug_handler]
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let service = BillingService::new(&state);
    let created = service.create_subscription(&principal, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            created,
            "Subscription created successfully",
        )),
    ))
}

#[axum::debug_handler]
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = BillingService::new(&state);
    let subscriptions = service.list_subscriptions(principal.id).await?;

    Ok(Json(ApiResponse::new(json!({
        "count": subscriptions.len(),
        "subscriptions": subscriptions
    }))))
}

#[axum::debug_handler]
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(subscription_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = BillingService::new(&state);
    let subscription = service.get_subscription(principal.id, subscription_id).await?;

    Ok(Json(ApiResponse::new(subscription)))
}

#[axum::debug_handler]
pub async fn cancel_subscription(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(subscription_id): Path<Uuid>,
    request: Option<Json<CancelSubscriptionRequest>>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let service = BillingService::new(&state);
    let subscription = service
        .cancel_subscription(principal.id, subscription_id, request)
        .await?;

    Ok(Json(ApiResponse::with_message(
        json!({ "subscription": subscription }),
        "Subscription cancelled successfully",
    )))
}
