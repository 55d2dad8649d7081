use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::DashboardService;

pub fn dashboard_routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/stats", get(handlers::get_dashboard_stats))
        .with_state(service)
}
