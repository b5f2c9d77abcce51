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

use crate::models::{CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::services::AppointmentService;

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AppointmentService::new(&state);
    let appointments = service.list_appointments(principal.id).await?;

    Ok(Json(ApiResponse::new(json!({
        "count": appointments.len(),
        "appointments": appointments
    }))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AppointmentService::new(&state);
    let appointment = service.get_appointment(principal.id, appointment_id).await?;

    Ok(Json(ApiResponse::new(json!({ "appointment": appointment }))))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let service = AppointmentService::new(&state);
    let appointment = service.create_appointment(principal.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            json!({ "appointment": appointment }),
            "Appointment created successfully",
        )),
    ))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AppointmentService::new(&state);
    let appointment = service
        .update_appointment(principal.id, appointment_id, request)
        .await?;

    Ok(Json(ApiResponse::with_message(
        json!({ "appointment": appointment }),
        "Appointment updated successfully",
    )))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AppointmentService::new(&state);
    service.delete_appointment(principal.id, appointment_id).await?;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        "Appointment deleted successfully",
    )))
}
