use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::scope::PATIENTS;
use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::auth::{Principal, Role};
use shared_models::error::AppError;
use shared_utils::jwt::sign_token;
use shared_utils::password::{hash_password, verify_password};

use crate::models::{
    CreatePatientRequest, Patient, PatientCredentials, PatientLoginRequest,
    PatientRegisterRequest, UpdatePatientRequest,
};

pub struct PatientService<'a> {
    store: &'a StoreClient,
    jwt_secret: &'a str,
    jwt_expiry_hours: i64,
}

impl<'a> PatientService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: &state.store,
            jwt_secret: &state.config.jwt_secret,
            jwt_expiry_hours: state.config.jwt_expiry_hours,
        }
    }

    pub async fn list_patients(&self, doctor_id: Uuid) -> Result<Vec<Patient>, AppError> {
        PATIENTS
            .list(self.store, doctor_id, Some("created_at.desc"))
            .await
    }

    pub async fn get_patient(&self, doctor_id: Uuid, patient_id: Uuid) -> Result<Patient, AppError> {
        PATIENTS.get(self.store, doctor_id, patient_id).await
    }

    pub async fn create_patient(
        &self,
        doctor_id: Uuid,
        request: CreatePatientRequest,
    ) -> Result<Patient, AppError> {
        let (first_name, last_name) = match (
            request.first_name.filter(|s| !s.is_empty()),
            request.last_name.filter(|s| !s.is_empty()),
        ) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Err(AppError::ValidationError(
                    "First name and last name are required".to_string(),
                ))
            }
        };

        debug!("Creating patient {} {} for doctor {}", first_name, last_name, doctor_id);

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "doctor_id": doctor_id,
            "first_name": first_name,
            "last_name": last_name,
            "email": request.email,
            "phone": request.phone,
            "date_of_birth": request.date_of_birth,
            "gender": request.gender,
            "medical_history": request.medical_history,
            "allergies": request.allergies,
            "current_medications": request.current_medications,
            "created_at": now,
            "updated_at": now
        });

        PATIENTS.insert(self.store, row).await
    }

    pub async fn update_patient(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, AppError> {
        let mut patch = Map::new();

        if let Some(first_name) = request.first_name {
            patch.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            patch.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(email) = request.email {
            patch.insert("email".to_string(), json!(email));
        }
        if let Some(phone) = request.phone {
            patch.insert("phone".to_string(), json!(phone));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            patch.insert("date_of_birth".to_string(), json!(date_of_birth));
        }
        if let Some(gender) = request.gender {
            patch.insert("gender".to_string(), json!(gender));
        }
        if let Some(medical_history) = request.medical_history {
            patch.insert("medical_history".to_string(), json!(medical_history));
        }
        if let Some(allergies) = request.allergies {
            patch.insert("allergies".to_string(), json!(allergies));
        }
        if let Some(current_medications) = request.current_medications {
            patch.insert("current_medications".to_string(), json!(current_medications));
        }

        patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        PATIENTS.update(self.store, doctor_id, patient_id, patch).await
    }

    pub async fn delete_patient(&self, doctor_id: Uuid, patient_id: Uuid) -> Result<(), AppError> {
        PATIENTS.delete(self.store, doctor_id, patient_id).await
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<PatientCredentials>, AppError> {
        let path = format!("/rest/v1/patients?email=eq.{}", email);
        let mut rows: Vec<PatientCredentials> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Self-registration: the patient starts unassigned (no owning doctor).
    pub async fn register(
        &self,
        request: PatientRegisterRequest,
    ) -> Result<(Patient, String), AppError> {
        let (email, password, first_name, last_name) = match (
            request.email.filter(|s| !s.is_empty()),
            request.password.filter(|s| !s.is_empty()),
            request.first_name.filter(|s| !s.is_empty()),
            request.last_name.filter(|s| !s.is_empty()),
        ) {
            (Some(e), Some(p), Some(f), Some(l)) => (e, p, f, l),
            _ => {
                return Err(AppError::ValidationError(
                    "Missing required fields: email, password, first_name, last_name".to_string(),
                ))
            }
        };

        if self.find_credentials(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash =
            hash_password(&password).map_err(|e| AppError::Internal(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": email,
            "phone": request.phone,
            "date_of_birth": request.date_of_birth,
            "password_hash": password_hash,
            "created_at": now,
            "updated_at": now
        });

        let patient: Patient = PATIENTS.insert(self.store, row).await?;
        let token = self.issue_token(patient.id, &email);

        Ok((patient, token))
    }

    pub async fn login(
        &self,
        request: PatientLoginRequest,
    ) -> Result<(PatientCredentials, String), AppError> {
        let (email, password) = match (request.email, request.password) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
            _ => {
                return Err(AppError::ValidationError(
                    "Email and password are required".to_string(),
                ))
            }
        };

        // Same generic rejection for an unknown email, a doctor-created row
        // without credentials, and a wrong password.
        let credentials = self
            .find_credentials(&email)
            .await?
            .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

        let hash = credentials
            .password_hash
            .clone()
            .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

        let valid =
            verify_password(&password, &hash).map_err(|e| AppError::Internal(e.to_string()))?;
        if !valid {
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }

        let token = self.issue_token(credentials.id, &email);
        Ok((credentials, token))
    }

    fn issue_token(&self, id: Uuid, email: &str) -> String {
        let principal = Principal {
            id,
            email: email.to_string(),
            role: Role::Patient,
        };
        sign_token(&principal, self.jwt_secret, self.jwt_expiry_hours)
    }
}
