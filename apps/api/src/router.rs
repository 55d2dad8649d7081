use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentService;
use dashboard_cell::router::dashboard_routes;
use dashboard_cell::services::DashboardService;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::DoctorService;
use shared_database::PostgrestClient;

/// Builds the full application router. Services share the injected store
/// handle; the dashboard aggregates over the other two services.
pub fn create_router(db: PostgrestClient) -> Router {
    let doctor_service = Arc::new(DoctorService::new(db.clone()));
    let appointment_service = Arc::new(AppointmentService::new(db));
    let dashboard_service = Arc::new(DashboardService::new(
        doctor_service.clone(),
        appointment_service.clone(),
    ));

    let api = Router::new()
        .nest("/doctors", doctor_routes(doctor_service))
        .nest("/appointments", appointment_routes(appointment_service))
        .nest("/dashboard", dashboard_routes(dashboard_service));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(not_found)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": "Medical Clinic Management System Backend",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
