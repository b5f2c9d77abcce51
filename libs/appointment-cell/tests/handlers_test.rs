use axum::extract::{Extension, Json, Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers::{
    create_appointment, delete_appointment, get_appointment, list_appointments,
    update_appointment,
};
use appointment_cell::models::{CreateAppointmentRequest, UpdateAppointmentRequest};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestPrincipal};

fn create_request(patient_id: Uuid) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id: Some(patient_id),
        appointment_date: NaiveDate::from_ymd_opt(2025, 6, 10),
        appointment_time: Some("10:30".to_string()),
        description: Some("Routine check-up".to_string()),
    }
}

#[tokio::test]
async fn list_orders_by_date_desc_then_time_asc() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(query_param("order", "appointment_date.desc,appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment_row(Uuid::new_v4(), doctor.id, Uuid::new_v4())
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let body = list_appointments(State(state), Extension(doctor.to_principal()))
        .await
        .unwrap();
    assert_eq!(body.0.data["count"], 1);
}

#[tokio::test]
async fn create_requires_patient_date_and_time() {
    let state = TestConfig::default().to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    let request = CreateAppointmentRequest {
        patient_id: Some(Uuid::new_v4()),
        appointment_date: None,
        appointment_time: Some("10:30".to_string()),
        description: None,
    };

    let result =
        create_appointment(State(state), Extension(doctor.to_principal()), Json(request)).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn create_for_an_unowned_patient_is_forbidden() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    // Parent lookup comes back empty: the patient belongs to someone else.
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = create_appointment(
        State(state),
        Extension(doctor.to_principal()),
        Json(create_request(Uuid::new_v4())),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn create_checks_the_parent_then_inserts_double_scoped() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let patient_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": patient_id }])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "doctor_id": doctor.id,
            "patient_id": patient_id,
            "status": "programada"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::appointment_row(appointment_id, doctor.id, patient_id)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = create_appointment(
        State(state),
        Extension(doctor.to_principal()),
        Json(create_request(patient_id)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.0.data["appointment"]["status"], "programada");
}

#[tokio::test]
async fn update_coalesces_unset_fields() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let appointment_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .and(body_partial_json(json!({"status": "completada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment_row(appointment_id, doctor.id, Uuid::new_v4())
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let request = UpdateAppointmentRequest {
        appointment_date: None,
        appointment_time: None,
        description: None,
        status: Some("completada".to_string()),
    };

    let body = update_appointment(
        State(state),
        Extension(doctor.to_principal()),
        Path(appointment_id),
        Json(request),
    )
    .await
    .unwrap();
    assert_eq!(body.0.status, "success");
}

#[tokio::test]
async fn cross_doctor_get_update_delete_all_read_as_not_found() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor_b = TestPrincipal::doctor("b@example.com");
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let get = get_appointment(
        State(state.clone()),
        Extension(doctor_b.to_principal()),
        Path(id),
    )
    .await;
    assert!(matches!(get, Err(AppError::NotFound(_))));

    let update = update_appointment(
        State(state.clone()),
        Extension(doctor_b.to_principal()),
        Path(id),
        Json(UpdateAppointmentRequest {
            appointment_date: None,
            appointment_time: None,
            description: None,
            status: Some("cancelada".to_string()),
        }),
    )
    .await;
    assert!(matches!(update, Err(AppError::NotFound(_))));

    let delete = delete_appointment(State(state), Extension(doctor_b.to_principal()), Path(id)).await;
    assert!(matches!(delete, Err(AppError::NotFound(_))));
}
