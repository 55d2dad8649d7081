use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentService;
use shared_config::AppConfig;
use shared_database::PostgrestClient;

fn test_app(mock_server: &MockServer) -> Router {
    let config = AppConfig {
        postgrest_url: mock_server.uri(),
        postgrest_api_key: "test-api-key".to_string(),
        port: 0,
    };
    let service = Arc::new(AppointmentService::new(PostgrestClient::new(&config)));
    appointment_routes(service)
}

fn appointment_row(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "doctorId": 1,
        "doctorName": "Dr. Anna",
        "doctorSpecialty": "Cardiology",
        "date": "2024-02-01",
        "time": "09:30",
        "patientName": "Pat",
        "patientEmail": "pat@example.com",
        "patientPhone": "555",
        "reason": null,
        "status": status,
        "createdAt": "2024-01-15T10:00:00.000Z",
        "updatedAt": Utc::now().to_rfc3339()
    })
}

fn doctor_row(id: i64, name: &str, specialty: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "specialty": specialty,
        "available": true,
        "phone": "123",
        "email": "doctor@example.com",
        "image": null,
        "createdAt": Utc::now().to_rfc3339(),
        "updatedAt": Utc::now().to_rfc3339()
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_appointments_defaults_to_date_then_time_descending() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "date.desc,time.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(2, "scheduled"),
            appointment_row(1, "completed"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_appointments_sort_by_defaults_to_ascending() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "patientName.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?sortBy=patientName")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_appointments_honors_explicit_sort_order() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "doctorName.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?sortBy=doctorName&sortOrder=DESC")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_appointments_rejects_unknown_sort_field() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?sortBy=createdAt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_appointments_status_all_disables_filter() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?status=all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_appointments_combines_filters() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.completed"))
        .and(query_param("doctorName", "ilike.%ann%"))
        .and(query_param("date", "eq.2024-02-01"))
        .and(query_param("patientName", "ilike.%pat%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(1, "completed")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?status=completed&doctorName=ann&date=2024-02-01&patientName=pat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["status"], "completed");
}

#[tokio::test]
async fn get_appointment_embeds_doctor() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    let mut row = appointment_row(10, "scheduled");
    row["doctor"] = doctor_row(1, "Dr. Anna", "Cardiology");

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.10"))
        .and(query_param("select", "*,doctor:doctors(*)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(Request::builder().uri("/10").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], 10);
    assert_eq!(body["doctor"]["name"], "Dr. Anna");
}

#[tokio::test]
async fn get_appointment_missing_is_404() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(Request::builder().uri("/99").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Appointment not found");
}

#[tokio::test]
async fn get_appointment_rejects_non_numeric_id() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    let response = app
        .oneshot(Request::builder().uri("/oops").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid appointment ID");
}

#[tokio::test]
async fn create_appointment_copies_doctor_fields_and_stamps_created_at() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row(1, "Dr. Anna", "Cardiology")
        ])))
        .mount(&mock_server)
        .await;

    // A client-supplied createdAt must never reach the store.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "createdAt": "1999-01-01T00:00:00Z" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "doctorId": 1,
            "doctorName": "Dr. Anna",
            "doctorSpecialty": "Cardiology",
            "status": "scheduled"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row(5, "scheduled")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "doctorId": 1,
                "date": "2024-02-01",
                "time": "09:30",
                "patientName": "Pat",
                "patientEmail": "pat@example.com",
                "patientPhone": "555",
                "createdAt": "1999-01-01T00:00:00Z"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "scheduled");
    assert_eq!(body["doctorName"], "Dr. Anna");
}

#[tokio::test]
async fn create_appointment_with_unknown_doctor_is_404() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "doctorId": 404,
                "date": "2024-02-01",
                "time": "09:30",
                "patientName": "Pat",
                "patientEmail": "pat@example.com",
                "patientPhone": "555"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Doctor not found");
}

#[tokio::test]
async fn create_appointment_validation_failure_lists_fields() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "date": "2024-02-01", "patientEmail": "nope" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    let properties: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["property"].as_str().unwrap())
        .collect();
    assert!(properties.contains(&"doctorId"));
    assert!(properties.contains(&"patientEmail"));
}

#[tokio::test]
async fn update_appointment_keeps_denormalized_fields_untouched() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    // Changing doctorId alone must not touch doctorName/doctorSpecialty.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "doctorName": "Dr. Bob" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.5"))
        .and(body_partial_json(json!({ "doctorId": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(5, "scheduled")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PUT")
        .uri("/5")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "doctorId": 2 }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_appointment_missing_is_404() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PUT")
        .uri("/42")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "time": "10:00" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_patch_updates_only_the_status_column() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.5"))
        .and(body_partial_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(5, "completed")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri("/5/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "completed" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "completed");
}

#[tokio::test]
async fn status_patch_rejects_values_outside_the_enum() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    // The store must stay untouched on a rejected status.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri("/5/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "archived" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid status");
}

#[tokio::test]
async fn status_patch_requires_the_status_field() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    let request = Request::builder()
        .method("PATCH")
        .uri("/5/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancel_is_update_status_cancelled_and_idempotent() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.5"))
        .and(body_partial_json(json!({ "status": "cancelled" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(5, "cancelled")
        ])))
        .expect(2)
        .mount(&mock_server)
        .await;

    for _ in 0..2 {
        let request = Request::builder()
            .method("PATCH")
            .uri("/5/cancel")
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "cancelled");
    }
}

#[tokio::test]
async fn delete_appointment_returns_204_with_empty_body() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(5, "scheduled")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/5")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn delete_appointment_missing_is_404() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server);

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/77")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
