use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/opening-hours", get(handlers::opening_hours::list_all))
        .route(
            "/api/opening-hours/for-date",
            get(handlers::opening_hours::hours_for_date),
        )
        .route(
            "/api/opening-hours/exceptions",
            get(handlers::opening_hours::list_exceptions),
        )
        .route(
            "/api/opening-hours/exceptions",
            post(handlers::opening_hours::add_exception),
        )
        .route(
            "/api/opening-hours/exceptions/:date",
            delete(handlers::opening_hours::remove_exception),
        )
        .route(
            "/api/opening-hours/:weekday",
            get(handlers::opening_hours::get_by_weekday),
        )
        .route(
            "/api/opening-hours/:weekday",
            put(handlers::opening_hours::upsert_weekday),
        )
}
