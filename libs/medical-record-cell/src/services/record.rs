use chrono::Utc;
use serde_json::{json, Map};
use tracing::debug;
use uuid::Uuid;

use shared_database::scope::{assert_owned_patient, MEDICAL_RECORDS};
use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{CreateMedicalRecordRequest, MedicalRecord, UpdateMedicalRecordRequest};

pub struct MedicalRecordService<'a> {
    store: &'a StoreClient,
}

impl<'a> MedicalRecordService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { store: &state.store }
    }

    /// History for one patient. The parent check rejects foreign patients
    /// with forbidden; the list itself is still filtered by doctor id.
    pub async fn list_for_patient(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Vec<MedicalRecord>, AppError> {
        assert_owned_patient(self.store, patient_id, doctor_id).await?;

        MEDICAL_RECORDS
            .list_filtered(
                self.store,
                doctor_id,
                &[("patient_id", format!("eq.{}", patient_id))],
                Some("record_date.desc"),
                None,
            )
            .await
    }

    pub async fn get_record(
        &self,
        doctor_id: Uuid,
        record_id: Uuid,
    ) -> Result<MedicalRecord, AppError> {
        MEDICAL_RECORDS.get(self.store, doctor_id, record_id).await
    }

    pub async fn create_record(
        &self,
        doctor_id: Uuid,
        request: CreateMedicalRecordRequest,
    ) -> Result<MedicalRecord, AppError> {
        let (patient_id, diagnosis) = match (
            request.patient_id,
            request.diagnosis.filter(|s| !s.is_empty()),
        ) {
            (Some(p), Some(d)) => (p, d),
            _ => {
                return Err(AppError::ValidationError(
                    "Missing required fields: patient_id, diagnosis".to_string(),
                ))
            }
        };

        assert_owned_patient(self.store, patient_id, doctor_id).await?;

        debug!("Creating medical record for patient {}", patient_id);

        let now = Utc::now();
        let row = json!({
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "diagnosis": diagnosis,
            "treatment": request.treatment,
            "medications": request.medications,
            "notes": request.notes,
            "record_date": request.record_date.unwrap_or(now),
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339()
        });

        MEDICAL_RECORDS.insert(self.store, row).await
    }

    pub async fn update_record(
        &self,
        doctor_id: Uuid,
        record_id: Uuid,
        request: UpdateMedicalRecordRequest,
    ) -> Result<MedicalRecord, AppError> {
        let mut patch = Map::new();

        if let Some(diagnosis) = request.diagnosis {
            patch.insert("diagnosis".to_string(), json!(diagnosis));
        }
        if let Some(treatment) = request.treatment {
            patch.insert("treatment".to_string(), json!(treatment));
        }
        if let Some(medications) = request.medications {
            patch.insert("medications".to_string(), json!(medications));
        }
        if let Some(notes) = request.notes {
            patch.insert("notes".to_string(), json!(notes));
        }

        patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        MEDICAL_RECORDS
            .update(self.store, doctor_id, record_id, patch)
            .await
    }

    pub async fn delete_record(&self, doctor_id: Uuid, record_id: Uuid) -> Result<(), AppError> {
        MEDICAL_RECORDS.delete(self.store, doctor_id, record_id).await
    }
}
