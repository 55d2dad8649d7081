use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    AppointmentFilters, CreateAppointmentRequest, UpdateAppointmentRequest, UpdateStatusRequest,
};
use crate::services::AppointmentService;

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid appointment ID".to_string()))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<Arc<AppointmentService>>,
    Query(filters): Query<AppointmentFilters>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.list_appointments(&filters).await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let appointment = service.get_appointment(id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(service): State<Arc<AppointmentService>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = service.create_appointment(request).await?;
    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let appointment = service.update_appointment(id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let status = request
        .status
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?;
    let appointment = service.update_status(id, &status).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let appointment = service.cancel_appointment(id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    service.delete_appointment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
