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

use crate::models::{
    CreatePatientRequest, PatientLoginRequest, PatientRegisterRequest, UpdatePatientRequest,
};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = PatientService::new(&state);
    let patients = service.list_patients(principal.id).await?;

    Ok(Json(ApiResponse::new(json!({
        "count": patients.len(),
        "patients": patients
    }))))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = PatientService::new(&state);
    let patient = service.get_patient(principal.id, patient_id).await?;

    Ok(Json(ApiResponse::new(json!({ "patient": patient }))))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let service = PatientService::new(&state);
    let patient = service.create_patient(principal.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            json!({ "patient": patient }),
            "Patient created successfully",
        )),
    ))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = PatientService::new(&state);
    let patient = service.update_patient(principal.id, patient_id, request).await?;

    Ok(Json(ApiResponse::with_message(
        json!({ "patient": patient }),
        "Patient updated successfully",
    )))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = PatientService::new(&state);
    service.delete_patient(principal.id, patient_id).await?;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        "Patient deleted successfully",
    )))
}

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PatientRegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let service = PatientService::new(&state);
    let (patient, token) = service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            json!({
                "patient": {
                    "id": patient.id,
                    "email": patient.email,
                    "first_name": patient.first_name,
                    "last_name": patient.last_name
                },
                "token": token
            }),
            "Patient registered successfully",
        )),
    ))
}

#[axum::debug_handler]
pub async fn login_patient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PatientLoginRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = PatientService::new(&state);
    let (credentials, token) = service.login(request).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "patient": {
                "id": credentials.id,
                "email": credentials.email,
                "first_name": credentials.first_name,
                "last_name": credentials.last_name
            },
            "token": token
        }),
        "Login successful",
    )))
}
