use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::state::AppState;
use shared_models::auth::{Principal, Role};

use crate::jwt::sign_token;

/// Configuration fixture for tests; every external collaborator gets a
/// localhost placeholder that wiremock-based tests override per server.
pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub openai_base_url: String,
    pub paypal_base_url: String,
    pub email_api_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            openai_base_url: "http://localhost:54322".to_string(),
            paypal_base_url: "http://localhost:54323".to_string(),
            email_api_url: "http://localhost:54324".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_store(mut self, url: &str) -> Self {
        self.store_url = url.to_string();
        self
    }

    pub fn with_openai(mut self, url: &str) -> Self {
        self.openai_base_url = url.to_string();
        self
    }

    pub fn with_paypal(mut self, url: &str) -> Self {
        self.paypal_base_url = url.to_string();
        self
    }

    pub fn with_email(mut self, url: &str) -> Self {
        self.email_api_url = url.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_service_key: "test-service-key".to_string(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_expiry_hours: 168,
            openai_api_key: "test-openai-key".to_string(),
            openai_base_url: self.openai_base_url.clone(),
            paypal_client_id: "test-paypal-client".to_string(),
            paypal_client_secret: "test-paypal-secret".to_string(),
            paypal_base_url: self.paypal_base_url.clone(),
            paypal_return_url: "http://localhost:3000/billing/return".to_string(),
            paypal_cancel_url: "http://localhost:3000/billing/cancel".to_string(),
            email_api_url: self.email_api_url.clone(),
            email_api_key: "test-email-key".to_string(),
            email_from: "no-reply@test.local".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            port: 5000,
        }
    }

    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config()))
    }
}

pub struct TestPrincipal {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl TestPrincipal {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn token(&self, secret: &str) -> String {
        sign_token(&self.to_principal(), secret, 24)
    }

    pub fn expired_token(&self, secret: &str) -> String {
        sign_token(&self.to_principal(), secret, -1)
    }
}

/// Canned store rows for wiremock bodies, shaped like the PostgREST
/// representation the services deserialize.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn user_row(id: Uuid, email: &str, password_hash: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": email,
            "password_hash": password_hash,
            "first_name": "Laura",
            "last_name": "Pérez",
            "specialization": "Cardiology",
            "license_number": "MED-12345",
            "phone": "+34 600 000 001",
            "role": "doctor",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_row(id: Uuid, doctor_id: Option<Uuid>) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "first_name": "Ana",
            "last_name": "García",
            "email": "ana@example.com",
            "phone": "+34 600 000 002",
            "date_of_birth": "1990-01-01",
            "gender": "female",
            "medical_history": null,
            "allergies": "pollen",
            "current_medications": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(id: Uuid, doctor_id: Uuid, patient_id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "appointment_date": "2025-06-10",
            "appointment_time": "10:30",
            "description": "Routine check-up",
            "status": "programada",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn medical_record_row(id: Uuid, doctor_id: Uuid, patient_id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "diagnosis": "flu",
            "treatment": "rest",
            "medications": null,
            "notes": null,
            "record_date": "2024-01-01T00:00:00Z",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn availability_row(
        id: Uuid,
        doctor_id: Uuid,
        day: &str,
        start_time: &str,
        end_time: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "day_of_week": day,
            "start_time": start_time,
            "end_time": end_time,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn subscription_row(id: Uuid, doctor_id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "provider_subscription_id": "I-TEST12345",
            "plan_id": "plan_basico_practia",
            "status": "active",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn gpt_interaction_row(id: Uuid, doctor_id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": null,
            "variant": "clinical",
            "message": "What is the recommended dosage?",
            "response": "The usual adult dose is...",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn notification_row(
        id: Uuid,
        doctor_id: Option<Uuid>,
        patient_id: Option<Uuid>,
        is_general: bool,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "is_general": is_general,
            "message": "You have a new appointment",
            "is_read": false,
            "read_at": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_profile_row(id: Uuid, name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "email": "doctor@example.com",
            "specialty": specialty,
            "phone": "+34 600 000 003",
            "bio": "General practice and internal medicine.",
            "years_experience": 10,
            "rating": 4.5,
            "total_reviews": 12,
            "city": "Madrid",
            "state": "Madrid",
            "profile_photo": null,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }
}
