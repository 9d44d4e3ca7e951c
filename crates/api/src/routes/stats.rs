use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/stats/utilization",
            get(handlers::stats::utilization),
        )
        .route(
            "/api/maintenance/cleanup",
            post(handlers::stats::cleanup_old_slots),
        )
}
