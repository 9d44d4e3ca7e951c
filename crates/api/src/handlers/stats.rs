//! # Statistics & Maintenance Handlers
//!
//! Read-side utilization aggregation and the retention cleanup job.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use slotbook_core::errors::SchedulerError;
use slotbook_core::models::slot_stats::{CleanupRequest, CleanupResponse, UtilizationStats};
use slotbook_db::repositories::scheduler;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Utilization over an inclusive date range: slot counts, orders placed,
/// and the orders-to-capacity percentage.
#[axum::debug_handler]
pub async fn utilization(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<UtilizationStats>, AppError> {
    if query.end < query.start {
        return Err(AppError(SchedulerError::Validation(format!(
            "range end {} precedes start {}",
            query.end, query.start
        ))));
    }

    let stats = scheduler::utilization(&state.db_pool, query.start, query.end).await?;
    Ok(Json(stats))
}

/// Deletes slots older than the retention horizon and reports how many
/// were removed.
#[axum::debug_handler]
pub async fn cleanup_old_slots(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CleanupRequest>,
) -> Result<Json<CleanupResponse>, AppError> {
    let retention_days = payload.retention_days.unwrap_or(state.retention_days);
    if retention_days < 0 {
        return Err(AppError(SchedulerError::Validation(format!(
            "retention days must be non-negative, got {retention_days}"
        ))));
    }

    let removed = scheduler::cleanup_old_slots(&state.db_pool, retention_days).await?;
    Ok(Json(CleanupResponse { removed }))
}
