use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::services::DashboardService;

#[axum::debug_handler]
pub async fn get_dashboard_stats(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<Value>, AppError> {
    let stats = service.get_stats().await?;
    Ok(Json(json!(stats)))
}
