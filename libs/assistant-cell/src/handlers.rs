use std::sync::Arc;

use axum::extract::{Extension, Json, Path, Query, State};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::state::AppState;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{AssistantVariant, ChatRequest, HistoryQuery};
use crate::services::AssistantService;

#[axum::debug_handler]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AssistantService::new(&state);
    let reply = service
        .chat(principal.id, AssistantVariant::Clinical, request)
        .await?;

    Ok(Json(ApiResponse::new(json!(reply))))
}

#[axum::debug_handler]
pub async fn mental_health_chat(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AssistantService::new(&state);
    let reply = service
        .chat(principal.id, AssistantVariant::MentalHealth, request)
        .await?;

    Ok(Json(ApiResponse::new(json!(reply))))
}

#[axum::debug_handler]
pub async fn history(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AssistantService::new(&state);
    let interactions = service.history(principal.id, query).await?;

    Ok(Json(ApiResponse::new(json!({
        "count": interactions.len(),
        "interactions": interactions
    }))))
}

#[axum::debug_handler]
pub async fn get_interaction(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(interaction_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AssistantService::new(&state);
    let interaction = service.get_interaction(principal.id, interaction_id).await?;

    Ok(Json(ApiResponse::new(json!({ "interaction": interaction }))))
}
