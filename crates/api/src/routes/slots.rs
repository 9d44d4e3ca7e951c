use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", get(handlers::slots::slots_by_range))
        .route("/api/slots/generate", post(handlers::slots::generate_slots))
        .route(
            "/api/slots/next-available",
            get(handlers::slots::next_available),
        )
        .route("/api/slots/assign", post(handlers::slots::assign_slot))
        .route(
            "/api/slots/assign-next",
            post(handlers::slots::assign_next_available),
        )
        .route(
            "/api/slots/available",
            get(handlers::slots::available_for_date),
        )
        .route(
            "/api/slots/validate-order-time",
            get(handlers::slots::validate_order_time),
        )
        .route("/api/slots/:id/release", post(handlers::slots::release_slot))
        .route("/api/slots/:id/close", post(handlers::slots::close_slot))
        .route("/api/slots/:id/reopen", post(handlers::slots::reopen_slot))
}
