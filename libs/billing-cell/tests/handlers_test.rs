use axum::extract::{Extension, Json, Path, State};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use billing_cell::handlers::{
    cancel_subscription, create_subscription, get_subscription, list_plans, list_subscriptions,
};
use billing_cell::models::{CancelSubscriptionRequest, CreateSubscriptionRequest};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestPrincipal};

fn token_mock() -> Mock {
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "token_type": "Bearer"
        })))
}

#[tokio::test]
async fn plan_catalog_is_public_and_complete() {
    let body = list_plans().await;
    let plans = body.0.data["plans"].as_array().unwrap().clone();
    assert_eq!(plans.len(), 4);
    assert!(plans.iter().any(|p| p["name"] == "Freemium"));
}

#[tokio::test]
async fn create_requires_a_plan_id() {
    let state = TestConfig::default().to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    let result = create_subscription(
        State(state),
        Extension(doctor.to_principal()),
        Json(CreateSubscriptionRequest {
            plan_id: None,
            return_url: None,
            cancel_url: None,
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn create_mirrors_the_provider_subscription_locally() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_paypal(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let local_id = Uuid::new_v4();

    token_mock().mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/billing/subscriptions"))
        .and(body_partial_json(json!({"plan_id": "plan_basico_practia"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "I-TEST12345",
            "status": "APPROVAL_PENDING",
            "links": [
                { "rel": "approve", "href": "https://provider.test/approve/I-TEST12345" },
                { "rel": "self", "href": "https://provider.test/I-TEST12345" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/subscriptions"))
        .and(body_partial_json(json!({
            "doctor_id": doctor.id,
            "provider_subscription_id": "I-TEST12345",
            "status": "active"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::subscription_row(local_id, doctor.id)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = create_subscription(
        State(state),
        Extension(doctor.to_principal()),
        Json(CreateSubscriptionRequest {
            plan_id: Some("plan_basico_practia".to_string()),
            return_url: None,
            cancel_url: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.0.data["subscription_id"], json!(local_id));
    assert_eq!(
        body.0.data["approval_url"],
        "https://provider.test/approve/I-TEST12345"
    );
}

#[tokio::test]
async fn provider_failure_on_create_writes_no_local_row() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_paypal(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    token_mock().mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/billing/subscriptions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = create_subscription(
        State(state),
        Extension(doctor.to_principal()),
        Json(CreateSubscriptionRequest {
            plan_id: Some("plan_basico_practia".to_string()),
            return_url: None,
            cancel_url: None,
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::ExternalService(_))));
}

#[tokio::test]
async fn get_enriches_the_local_row_with_live_provider_status() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_paypal(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let local_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(query_param("id", format!("eq.{}", local_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::subscription_row(local_id, doctor.id)
        ])))
        .mount(&server)
        .await;

    token_mock().mount(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/billing/subscriptions/I-TEST12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "I-TEST12345",
            "status": "ACTIVE"
        })))
        .mount(&server)
        .await;

    let body = get_subscription(
        State(state),
        Extension(doctor.to_principal()),
        Path(local_id),
    )
    .await
    .unwrap();

    assert_eq!(body.0.data["status"], "ACTIVE");
    assert_eq!(body.0.data["provider_details"]["id"], "I-TEST12345");
}

#[tokio::test]
async fn cancel_is_scoped_and_marks_the_local_row_cancelled() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_paypal(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let local_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::subscription_row(local_id, doctor.id)
        ])))
        .mount(&server)
        .await;

    token_mock().mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/billing/subscriptions/I-TEST12345/cancel"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut cancelled = MockStoreRows::subscription_row(local_id, doctor.id);
    cancelled["status"] = json!("cancelled");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/subscriptions"))
        .and(body_partial_json(json!({"status": "cancelled"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cancelled])))
        .expect(1)
        .mount(&server)
        .await;

    let body = cancel_subscription(
        State(state),
        Extension(doctor.to_principal()),
        Path(local_id),
        Some(Json(CancelSubscriptionRequest { reason: None })),
    )
    .await
    .unwrap();

    assert_eq!(body.0.data["subscription"]["status"], "cancelled");
}

#[tokio::test]
async fn cancelling_an_unowned_subscription_is_not_found_before_any_provider_call() {
    let server = MockServer::start().await;
    let state = TestConfig::default()
        .with_store(&server.uri())
        .with_paypal(&server.uri())
        .to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = cancel_subscription(
        State(state),
        Extension(doctor.to_principal()),
        Path(Uuid::new_v4()),
        None,
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn list_is_scoped_to_the_doctor() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::subscription_row(Uuid::new_v4(), doctor.id)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let body = list_subscriptions(State(state), Extension(doctor.to_principal()))
        .await
        .unwrap();
    assert_eq!(body.0.data["count"], 1);
}
