use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::SetHoursRequest;
use doctor_cell::services::AvailabilityService;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestPrincipal};

fn hours(day: &str, start: &str, end: &str) -> SetHoursRequest {
    SetHoursRequest {
        day: Some(day.to_string()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
    }
}

#[tokio::test]
async fn set_hours_validates_day_and_time_format() {
    let state = TestConfig::default().to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let service = AvailabilityService::new(&state);

    let bad_day = service.set_hours(doctor.id, hours("Funday", "09:00", "17:00")).await;
    assert!(matches!(bad_day, Err(AppError::ValidationError(_))));

    let unpadded = service.set_hours(doctor.id, hours("Monday", "9:00", "17:00")).await;
    assert!(matches!(unpadded, Err(AppError::ValidationError(_))));

    let inverted = service.set_hours(doctor.id, hours("Monday", "17:00", "09:00")).await;
    assert!(matches!(inverted, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn set_hours_inserts_when_the_day_is_unset() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let slot_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(query_param("day_of_week", "eq.Monday"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_availability"))
        .and(body_partial_json(json!({
            "doctor_id": doctor.id,
            "day_of_week": "Monday",
            "start_time": "09:00",
            "end_time": "17:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::availability_row(slot_id, doctor.id, "Monday", "09:00", "17:00")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = AvailabilityService::new(&state);
    let (slot, created) = service
        .set_hours(doctor.id, hours("Monday", "09:00", "17:00"))
        .await
        .unwrap();

    assert!(created);
    assert_eq!(slot.id, slot_id);
}

#[tokio::test]
async fn set_hours_updates_in_place_when_the_day_exists() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");
    let slot_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::availability_row(slot_id, doctor.id, "Monday", "08:00", "12:00")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("id", format!("eq.{}", slot_id)))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(body_partial_json(json!({"start_time": "09:00", "end_time": "17:00"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::availability_row(slot_id, doctor.id, "Monday", "09:00", "17:00")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = AvailabilityService::new(&state);
    let (slot, created) = service
        .set_hours(doctor.id, hours("Monday", "09:00", "17:00"))
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(slot.start_time, "09:00");
}

#[tokio::test]
async fn get_hours_sorts_monday_first() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::availability_row(Uuid::new_v4(), doctor.id, "Sunday", "10:00", "14:00"),
            MockStoreRows::availability_row(Uuid::new_v4(), doctor.id, "Wednesday", "09:00", "17:00"),
            MockStoreRows::availability_row(Uuid::new_v4(), doctor.id, "Monday", "09:00", "17:00"),
        ])))
        .mount(&server)
        .await;

    let service = AvailabilityService::new(&state);
    let slots = service.get_hours(doctor.id).await.unwrap();

    let days: Vec<String> = slots.iter().map(|s| s.day_of_week.to_string()).collect();
    assert_eq!(days, vec!["Monday", "Wednesday", "Sunday"]);
}

#[tokio::test]
async fn deleting_hours_for_an_unset_day_is_not_found() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor = TestPrincipal::doctor("doc@example.com");

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("day_of_week", "eq.Tuesday"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = AvailabilityService::new(&state);
    let result = service.delete_hours(doctor.id, "Tuesday").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn check_is_inclusive_at_both_range_bounds() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();
    let doctor_id = Uuid::new_v4();

    // 2025-06-10 is a Tuesday.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("day_of_week", "eq.Tuesday"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::availability_row(Uuid::new_v4(), doctor_id, "Tuesday", "09:00", "17:00")
        ])))
        .mount(&server)
        .await;

    let service = AvailabilityService::new(&state);

    let at_start = service.check(doctor_id, "2025-06-10", "09:00").await.unwrap();
    assert!(at_start.available);

    let at_end = service.check(doctor_id, "2025-06-10", "17:00").await.unwrap();
    assert!(at_end.available);

    let after = service.check(doctor_id, "2025-06-10", "17:01").await.unwrap();
    assert!(!after.available);
    assert_eq!(after.day_of_week, "Tuesday");
}

#[tokio::test]
async fn check_without_hours_for_the_day_is_unavailable_not_an_error() {
    let server = MockServer::start().await;
    let state = TestConfig::default().with_store(&server.uri()).to_state();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = AvailabilityService::new(&state);
    let check = service.check(Uuid::new_v4(), "2025-06-10", "09:00").await.unwrap();
    assert!(!check.available);
    assert!(check.start_time.is_none());
}

#[tokio::test]
async fn check_rejects_an_unparseable_date() {
    let state = TestConfig::default().to_state();
    let service = AvailabilityService::new(&state);

    let result = service.check(Uuid::new_v4(), "10/06/2025", "09:00").await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}
