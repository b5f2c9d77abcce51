use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inbox entry. A row targets one doctor, one patient, or everyone
/// (`is_general`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub is_general: bool,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentEmailRequest {
    pub patient_email: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorEmailRequest {
    pub doctor_email: Option<String>,
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
}
