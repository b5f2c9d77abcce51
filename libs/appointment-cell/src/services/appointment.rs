use chrono::Utc;
use serde_json::{json, Map};
use tracing::debug;
use uuid::Uuid;

use shared_database::scope::{assert_owned_patient, APPOINTMENTS};
use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{
    Appointment, CreateAppointmentRequest, UpdateAppointmentRequest, DEFAULT_STATUS,
};

pub struct AppointmentService<'a> {
    store: &'a StoreClient,
}

impl<'a> AppointmentService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { store: &state.store }
    }

    pub async fn list_appointments(&self, doctor_id: Uuid) -> Result<Vec<Appointment>, AppError> {
        APPOINTMENTS
            .list(
                self.store,
                doctor_id,
                Some("appointment_date.desc,appointment_time.asc"),
            )
            .await
    }

    pub async fn get_appointment(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppError> {
        APPOINTMENTS.get(self.store, doctor_id, appointment_id).await
    }

    pub async fn create_appointment(
        &self,
        doctor_id: Uuid,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        let (patient_id, appointment_date, appointment_time) = match (
            request.patient_id,
            request.appointment_date,
            request.appointment_time.filter(|s| !s.is_empty()),
        ) {
            (Some(p), Some(d), Some(t)) => (p, d, t),
            _ => {
                return Err(AppError::ValidationError(
                    "Missing required fields: patient_id, appointment_date, appointment_time"
                        .to_string(),
                ))
            }
        };

        // Appointments are authorized through their patient; the insert below
        // still carries the doctor id.
        assert_owned_patient(self.store, patient_id, doctor_id).await?;

        debug!(
            "Creating appointment for patient {} on {} {}",
            patient_id, appointment_date, appointment_time
        );

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "appointment_date": appointment_date,
            "appointment_time": appointment_time,
            "description": request.description,
            "status": DEFAULT_STATUS,
            "created_at": now,
            "updated_at": now
        });

        APPOINTMENTS.insert(self.store, row).await
    }

    pub async fn update_appointment(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        let mut patch = Map::new();

        if let Some(appointment_date) = request.appointment_date {
            patch.insert("appointment_date".to_string(), json!(appointment_date));
        }
        if let Some(appointment_time) = request.appointment_time {
            patch.insert("appointment_time".to_string(), json!(appointment_time));
        }
        if let Some(description) = request.description {
            patch.insert("description".to_string(), json!(description));
        }
        if let Some(status) = request.status {
            patch.insert("status".to_string(), json!(status));
        }

        patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        APPOINTMENTS
            .update(self.store, doctor_id, appointment_id, patch)
            .await
    }

    pub async fn delete_appointment(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<(), AppError> {
        APPOINTMENTS.delete(self.store, doctor_id, appointment_id).await
    }
}
