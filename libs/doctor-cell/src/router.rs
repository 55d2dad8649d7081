use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use crate::handlers;
use crate::services::DoctorService;

pub fn doctor_routes(service: Arc<DoctorService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::create_doctor))
        .route(
            "/{id}",
            get(handlers::get_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::delete_doctor),
        )
        .with_state(service)
}
