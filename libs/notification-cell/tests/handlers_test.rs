use axum::extract::{Extension, Json, Path, State};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::handlers::{list_inbox, mark_read, send_confirmation};
use notification_cell::models::AppointmentEmailRequest;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestPrincipal};

fn email_request() -> AppointmentEmailRequest {
    AppointmentEmailRequest {
        patient_email: Some("ana@example.com".to_string()),
        patient_name: Some("Ana García".to_string()),
        doctor_name: Some("Dr. Pérez".to_string()),
        appointment_date: Some("2025-06-10".to_string()),
        appointment_time: Some("10:30".to_string()),
        reason: None,
    }
}

#[tokio::test]
async fn inbox_queries_the_recipient_or_general_rows() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/notifications"))
        .and(query_param(
            "or",
            format!("(doctor_id.eq.{},is_general.is.true)", doctor.id),
        ))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::notification_row(Uuid::new_v4(), Some(doctor.id), None, false),
            MockStoreRows::notification_row(Uuid::new_v4(), None, None, true),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let body = list_inbox(State(state), Extension(doctor.to_principal()))
        .await
        .unwrap();
    assert_eq!(body.0.data["count"], 2);
}

#[tokio::test]
async fn marking_a_foreign_notification_read_is_not_found() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = mark_read(
        State(state),
        Extension(doctor.to_principal()),
        Path(Uuid::new_v4()),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn marking_read_sets_the_flag_and_timestamp() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let id = Uuid::new_v4();

    let mut row = MockStoreRows::notification_row(id, Some(doctor.id), None, false);
    row["is_read"] = json!(true);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/notifications"))
        .and(query_param("id", format!("eq.{}", id)))
        .and(body_partial_json(json!({"is_read": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .expect(1)
        .mount(&server)
        .await;

    let body = mark_read(State(state), Extension(doctor.to_principal()), Path(id))
        .await
        .unwrap();
    assert_eq!(body.0.data["notification"]["is_read"], true);
}

#[tokio::test]
async fn confirmation_email_requires_the_addressing_fields() {
    let state = TestConfig::default().to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    let mut request = email_request();
    request.patient_email = None;

    let result = send_confirmation(State(state), Extension(doctor.to_principal()), Json(request)).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn confirmation_email_is_handed_to_the_provider() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_email(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(json!({"to": "ana@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let body = send_confirmation(
        State(state),
        Extension(doctor.to_principal()),
        Json(email_request()),
    )
    .await
    .unwrap();
    assert_eq!(body.0.message.unwrap(), "confirmation email sent");
}

#[tokio::test]
async fn provider_rejection_reports_failure_without_a_5xx() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_email(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500).set_body_string("smtp down"))
        .mount(&server)
        .await;

    let body = send_confirmation(
        State(state),
        Extension(doctor.to_principal()),
        Json(email_request()),
    )
    .await
    .unwrap();
    assert!(body.0.message.unwrap().starts_with("Failed"));
}
