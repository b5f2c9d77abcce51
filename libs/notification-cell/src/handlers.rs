use std::sync::Arc;

use axum::extract::{Extension, Json, Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::state::AppState;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{AppointmentEmailRequest, DoctorEmailRequest};
use crate::services::email::{
    cancellation_email, confirmation_email, new_appointment_email, reminder_email,
};
use crate::services::{EmailClient, NotificationService};

fn delivery_message(sent: bool, what: &str) -> String {
    if sent {
        format!("{} email sent", what)
    } else {
        format!("Failed to send {} email", what)
    }
}

#[axum::debug_handler]
pub async fn list_inbox(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = NotificationService::new(&state);
    let notifications = service.list_inbox(&principal).await?;

    Ok(Json(ApiResponse::new(json!({
        "count": notifications.len(),
        "notifications": notifications
    }))))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let service = NotificationService::new(&state);
    let notification = service.mark_read(&principal, notification_id).await?;

    Ok(Json(ApiResponse::new(json!({ "notification": notification }))))
}

#[axum::debug_handler]
pub async fn send_confirmation(
    State(state): State<Arc<AppState>>,
    Extension(_principal): Extension<Principal>,
    Json(request): Json<AppointmentEmailRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (email, patient, doctor, date, time) = match (
        request.patient_email.filter(|s| !s.is_empty()),
        request.patient_name.filter(|s| !s.is_empty()),
        request.doctor_name.filter(|s| !s.is_empty()),
        request.appointment_date.filter(|s| !s.is_empty()),
        request.appointment_time.filter(|s| !s.is_empty()),
    ) {
        (Some(e), Some(p), Some(d), Some(dt), Some(t)) => (e, p, d, dt, t),
        _ => {
            return Err(AppError::ValidationError(
                "Missing required email fields".to_string(),
            ))
        }
    };

    let (subject, html) = confirmation_email(&patient, &doctor, &date, &time);
    let sent = EmailClient::new(&state.config).send(&email, &subject, &html).await;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        delivery_message(sent, "confirmation"),
    )))
}

#[axum::debug_handler]
pub async fn send_reminder(
    State(state): State<Arc<AppState>>,
    Extension(_principal): Extension<Principal>,
    Json(request): Json<AppointmentEmailRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (email, patient, doctor, date, time) = match (
        request.patient_email.filter(|s| !s.is_empty()),
        request.patient_name.filter(|s| !s.is_empty()),
        request.doctor_name.filter(|s| !s.is_empty()),
        request.appointment_date.filter(|s| !s.is_empty()),
        request.appointment_time.filter(|s| !s.is_empty()),
    ) {
        (Some(e), Some(p), Some(d), Some(dt), Some(t)) => (e, p, d, dt, t),
        _ => {
            return Err(AppError::ValidationError(
                "Missing required email fields".to_string(),
            ))
        }
    };

    let (subject, html) = reminder_email(&patient, &doctor, &date, &time);
    let sent = EmailClient::new(&state.config).send(&email, &subject, &html).await;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        delivery_message(sent, "reminder"),
    )))
}

#[axum::debug_handler]
pub async fn send_cancellation(
    State(state): State<Arc<AppState>>,
    Extension(_principal): Extension<Principal>,
    Json(request): Json<AppointmentEmailRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (email, patient, doctor, date) = match (
        request.patient_email.filter(|s| !s.is_empty()),
        request.patient_name.filter(|s| !s.is_empty()),
        request.doctor_name.filter(|s| !s.is_empty()),
        request.appointment_date.filter(|s| !s.is_empty()),
    ) {
        (Some(e), Some(p), Some(d), Some(dt)) => (e, p, d, dt),
        _ => {
            return Err(AppError::ValidationError(
                "Missing required email fields".to_string(),
            ))
        }
    };

    let (subject, html) = cancellation_email(
        &patient,
        &doctor,
        &date,
        request.appointment_time.as_deref(),
        request.reason.as_deref(),
    );
    let sent = EmailClient::new(&state.config).send(&email, &subject, &html).await;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        delivery_message(sent, "cancellation"),
    )))
}

#[axum::debug_handler]
pub async fn send_doctor_new_appointment(
    State(state): State<Arc<AppState>>,
    Extension(_principal): Extension<Principal>,
    Json(request): Json<DoctorEmailRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (email, doctor, patient, date) = match (
        request.doctor_email.filter(|s| !s.is_empty()),
        request.doctor_name.filter(|s| !s.is_empty()),
        request.patient_name.filter(|s| !s.is_empty()),
        request.appointment_date.filter(|s| !s.is_empty()),
    ) {
        (Some(e), Some(d), Some(p), Some(dt)) => (e, d, p, dt),
        _ => {
            return Err(AppError::ValidationError(
                "Missing required email fields".to_string(),
            ))
        }
    };

    let (subject, html) =
        new_appointment_email(&doctor, &patient, &date, request.appointment_time.as_deref());
    let sent = EmailClient::new(&state.config).send(&email, &subject, &html).await;

    Ok(Json(ApiResponse::with_message(
        Value::Null,
        delivery_message(sent, "notification"),
    )))
}
