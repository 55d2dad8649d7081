use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers;
use crate::services::AppointmentService;

pub fn appointment_routes(service: Arc<AppointmentService>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/{id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .route("/{id}/status", patch(handlers::update_appointment_status))
        .route("/{id}/cancel", patch(handlers::cancel_appointment))
        .with_state(service)
}
