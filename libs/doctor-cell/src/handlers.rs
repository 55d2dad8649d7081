use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, DoctorFilters, UpdateDoctorRequest};
use crate::services::DoctorService;

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid doctor ID".to_string()))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(service): State<Arc<DoctorService>>,
    Query(filters): Query<DoctorFilters>,
) -> Result<Json<Value>, AppError> {
    let doctors = service.list_doctors(&filters).await?;
    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(service): State<Arc<DoctorService>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let doctor = service.get_doctor(id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(service): State<Arc<DoctorService>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor = service.create_doctor(request).await?;
    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(service): State<Arc<DoctorService>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let doctor = service.update_doctor(id, request).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(service): State<Arc<DoctorService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    service.delete_doctor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
