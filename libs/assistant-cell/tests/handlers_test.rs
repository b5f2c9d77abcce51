use axum::extract::{Extension, Json, Query, State};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assistant_cell::handlers::{chat, history, mental_health_chat};
use assistant_cell::models::{ChatRequest, HistoryQuery};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestPrincipal};

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn chat_requires_a_message() {
    let state = TestConfig::default().to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    let result = chat(
        State(state),
        Extension(doctor.to_principal()),
        Json(ChatRequest {
            message: None,
            patient_id: None,
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn chat_with_a_foreign_patient_is_forbidden_before_any_provider_call() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_openai(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    // No completion mock is mounted: a provider call would fail the test.
    let result = chat(
        State(state),
        Extension(doctor.to_principal()),
        Json(ChatRequest {
            message: Some("dosage question".to_string()),
            patient_id: Some(Uuid::new_v4()),
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn chat_logs_the_exchange_and_echoes_the_completion() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_openai(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let interaction_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("The usual adult dose is...")))
        .expect(1)
        .mount(&server)
        .await;

    let mut row = MockStoreRows::gpt_interaction_row(interaction_id, doctor.id);
    row["response"] = json!("The usual adult dose is...");

    Mock::given(method("POST"))
        .and(path("/rest/v1/gpt_interactions"))
        .and(body_partial_json(json!({
            "doctor_id": doctor.id,
            "variant": "clinical"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row])))
        .expect(1)
        .mount(&server)
        .await;

    let body = chat(
        State(state),
        Extension(doctor.to_principal()),
        Json(ChatRequest {
            message: Some("What is the recommended dosage?".to_string()),
            patient_id: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(body.0.data["interaction_id"], json!(interaction_id));
    assert_eq!(body.0.data["response"], "The usual adult dose is...");
    assert_eq!(body.0.data["variant"], "clinical");
}

#[tokio::test]
async fn mental_health_chat_is_tagged_with_its_own_variant() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_openai(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Take a breath.")))
        .mount(&server)
        .await;

    let mut row = MockStoreRows::gpt_interaction_row(Uuid::new_v4(), doctor.id);
    row["variant"] = json!("mental_health");

    Mock::given(method("POST"))
        .and(path("/rest/v1/gpt_interactions"))
        .and(body_partial_json(json!({"variant": "mental_health"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row])))
        .expect(1)
        .mount(&server)
        .await;

    let body = mental_health_chat(
        State(state),
        Extension(doctor.to_principal()),
        Json(ChatRequest {
            message: Some("I need support phrasing".to_string()),
            patient_id: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(body.0.data["variant"], "mental_health");
}

#[tokio::test]
async fn provider_outage_surfaces_as_an_external_service_error() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_openai(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&server)
        .await;

    let result = chat(
        State(state),
        Extension(doctor.to_principal()),
        Json(ChatRequest {
            message: Some("hello".to_string()),
            patient_id: None,
        }),
    )
    .await;

    match result.unwrap_err() {
        AppError::ExternalService(msg) => assert!(msg.contains("upstream overloaded")),
        other => panic!("expected ExternalService error, got {:?}", other),
    }
}

#[tokio::test]
async fn history_is_scoped_filtered_and_capped() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/gpt_interactions"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(query_param("variant", "eq.clinical"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::gpt_interaction_row(Uuid::new_v4(), doctor.id)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // A limit above the cap is clamped to 500.
    let body = history(
        State(state),
        Extension(doctor.to_principal()),
        Query(HistoryQuery {
            patient_id: None,
            variant: Some("clinical".to_string()),
            limit: Some(9999),
        }),
    )
    .await
    .unwrap();

    assert_eq!(body.0.data["count"], 1);
}
