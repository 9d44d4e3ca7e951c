//! # Slot Handlers
//!
//! Checkout-facing scheduling operations: generation, next-available
//! search, capacity-checked assignment, release, and the admin
//! close/reopen actions.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use slotbook_core::models::time_slot::{
    AssignNextRequest, AssignSlotRequest, GenerateSlotsRequest, NextAvailableResponse,
    ReleaseSlotRequest, TimeSlot, ValidateOrderTimeResponse,
};
use slotbook_db::repositories::scheduler;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct NextAvailableQuery {
    /// First date to consider; defaults to today.
    pub from: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub only_available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct OrderTimeQuery {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Generates slots for one day from the opening-hours configuration.
/// A closed day returns an empty list; already existing windows are
/// reused, never duplicated.
#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<GenerateSlotsRequest>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = scheduler::generate_for_day(&state.db_pool, payload.date).await?;
    Ok(Json(slots))
}

/// First chronological slot with remaining capacity, lazily generating
/// the scheduling horizon when nothing persisted qualifies.
#[axum::debug_handler]
pub async fn next_available(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<NextAvailableQuery>,
) -> Result<Json<NextAvailableResponse>, AppError> {
    let from = query.from.unwrap_or_else(|| Utc::now().date_naive());
    let slot = scheduler::find_next_available(&state.db_pool, from).await?;
    Ok(Json(NextAvailableResponse { slot }))
}

/// Assigns an order to the slot starting at the given date and time.
#[axum::debug_handler]
pub async fn assign_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AssignSlotRequest>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = scheduler::assign(
        &state.db_pool,
        payload.order_id,
        payload.date,
        payload.start_time,
    )
    .await?;
    Ok(Json(slot))
}

/// Assigns an order to the next available slot within the horizon.
#[axum::debug_handler]
pub async fn assign_next_available(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AssignNextRequest>,
) -> Result<Json<TimeSlot>, AppError> {
    let from = payload.from_date.unwrap_or_else(|| Utc::now().date_naive());
    let slot =
        scheduler::assign_to_next_available(&state.db_pool, payload.order_id, from).await?;
    Ok(Json(slot))
}

/// Releases an order from a slot; a full slot becomes active again.
#[axum::debug_handler]
pub async fn release_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
    Json(payload): Json<ReleaseSlotRequest>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = scheduler::release(&state.db_pool, payload.order_id, slot_id).await?;
    Ok(Json(slot))
}

/// Admin close; refused while any order is still assigned.
#[axum::debug_handler]
pub async fn close_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = scheduler::close_slot(&state.db_pool, slot_id).await?;
    Ok(Json(slot))
}

/// Admin reopen of a manually closed slot.
#[axum::debug_handler]
pub async fn reopen_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = scheduler::reopen_slot(&state.db_pool, slot_id).await?;
    Ok(Json(slot))
}

/// Slots still accepting orders on a date, generating the day on first
/// access.
#[axum::debug_handler]
pub async fn available_for_date(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = scheduler::available_slots_for_date(&state.db_pool, query.date).await?;
    Ok(Json(slots))
}

/// Inclusive range scan, optionally limited to available slots.
#[axum::debug_handler]
pub async fn slots_by_range(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = scheduler::slots_by_range(
        &state.db_pool,
        query.start,
        query.end,
        query.only_available.unwrap_or(false),
    )
    .await?;
    Ok(Json(slots))
}

/// Whether an order may still be placed for the given slot time: strictly
/// in the future and within the scheduling horizon.
#[axum::debug_handler]
pub async fn validate_order_time(
    Query(query): Query<OrderTimeQuery>,
) -> Json<ValidateOrderTimeResponse> {
    Json(ValidateOrderTimeResponse {
        valid: scheduler::is_valid_order_time(query.date, query.start_time),
    })
}
