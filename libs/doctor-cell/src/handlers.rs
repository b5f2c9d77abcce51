use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::state::AppState;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{
    AvailabilityCheckQuery, FilterSearchQuery, LocationSearchQuery, SetHoursRequest,
    SetSpecialtiesRequest, SpecialtySearchQuery,
};
use crate::services::{AvailabilityService, DirectoryService};

// ---- availability -----------------------------------------------------------

#[axum::debug_handler]
pub async fn set_specialties(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<SetSpecialtiesRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let specialties = request.specialties.unwrap_or_default();

    let service = AvailabilityService::new(&state);
    let row = service.set_specialties(principal.id, specialties).await?;

    Ok(Json(ApiResponse::with_message(
        row,
        "Specialties updated successfully",
    )))
}

#[axum::debug_handler]
pub async fn get_specialties(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AvailabilityService::new(&state);
    let specialties = service.get_specialties(principal.id).await?;

    Ok(Json(ApiResponse::new(json!(specialties))))
}

#[axum::debug_handler]
pub async fn set_hours(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<SetHoursRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let service = AvailabilityService::new(&state);
    let (slot, created) = service.set_hours(principal.id, request).await?;

    let (status, message) = if created {
        (StatusCode::CREATED, "Working hours created successfully")
    } else {
        (StatusCode::OK, "Working hours updated")
    };

    Ok((status, Json(ApiResponse::with_message(json!(slot), message))))
}

#[axum::debug_handler]
pub async fn get_hours(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AvailabilityService::new(&state);
    let slots = service.get_hours(principal.id).await?;

    Ok(Json(ApiResponse::new(json!(slots))))
}

#[axum::debug_handler]
pub async fn delete_hours(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(day): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = AvailabilityService::new(&state);
    service.delete_hours(principal.id, &day).await?;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        "Working hours deleted successfully",
    )))
}

#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AvailabilityCheckQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (date, time) = match (
        query.date.filter(|s| !s.is_empty()),
        query.time.filter(|s| !s.is_empty()),
    ) {
        (Some(d), Some(t)) => (d, t),
        _ => {
            return Err(AppError::ValidationError(
                "Date and time are required".to_string(),
            ))
        }
    };

    let service = AvailabilityService::new(&state);
    let check = service.check(doctor_id, &date, &time).await?;

    Ok(Json(ApiResponse::new(json!(check))))
}

// ---- directory search -------------------------------------------------------

#[axum::debug_handler]
pub async fn search_by_specialty(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpecialtySearchQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = DirectoryService::new(&state);
    let (doctors, pagination) = service.search_by_specialty(query).await?;

    Ok(Json(ApiResponse::new(json!({
        "doctors": doctors,
        "pagination": pagination
    }))))
}

#[axum::debug_handler]
pub async fn search_by_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationSearchQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = DirectoryService::new(&state);
    let (doctors, pagination) = service.search_by_location(query).await?;

    Ok(Json(ApiResponse::new(json!({
        "doctors": doctors,
        "pagination": pagination
    }))))
}

#[axum::debug_handler]
pub async fn search_with_filters(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterSearchQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let filters_echo = json!({
        "specialty": query.specialty.clone().unwrap_or_else(|| "All".to_string()),
        "min_rating": query.rating_min.unwrap_or(0.0),
        "min_experience": query.years_min.unwrap_or(0)
    });

    let service = DirectoryService::new(&state);
    let (doctors, pagination) = service.filter(query).await?;

    Ok(Json(ApiResponse::new(json!({
        "doctors": doctors,
        "pagination": pagination,
        "filters": filters_echo
    }))))
}

#[axum::debug_handler]
pub async fn get_doctor_profile(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = DirectoryService::new(&state);
    let profile = service.get_profile(&doctor_id).await?;

    Ok(Json(ApiResponse::new(json!({ "doctor": profile }))))
}
