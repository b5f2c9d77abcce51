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

use crate::models::{CreateMedicalRecordRequest, UpdateMedicalRecordRequest};
use crate::services::MedicalRecordService;

#[axum::debug_handler]
pub async fn list_records_for_patient(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = MedicalRecordService::new(&state);
    let records = service.list_for_patient(principal.id, patient_id).await?;

    Ok(Json(ApiResponse::new(json!({
        "count": records.len(),
        "records": records
    }))))
}

#[axum::debug_handler]
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = MedicalRecordService::new(&state);
    let record = service.get_record(principal.id, record_id).await?;

    Ok(Json(ApiResponse::new(json!({ "record": record }))))
}

#[axum::debug_handler]
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateMedicalRecordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let service = MedicalRecordService::new(&state);
    let record = service.create_record(principal.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            json!({ "record": record }),
            "Medical record created successfully",
        )),
    ))
}

#[axum::debug_handler]
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<Uuid>,
    Json(request): Json<UpdateMedicalRecordRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = MedicalRecordService::new(&state);
    let record = service.update_record(principal.id, record_id, request).await?;

    Ok(Json(ApiResponse::with_message(
        json!({ "record": record }),
        "Medical record updated successfully",
    )))
}

#[axum::debug_handler]
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = MedicalRecordService::new(&state);
    service.delete_record(principal.id, record_id).await?;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        "Medical record deleted successfully",
    )))
}
