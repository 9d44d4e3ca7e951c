//! # Opening-Hours Handlers
//!
//! Admin surface for the weekly opening-hours policy and its date
//! exceptions. Changes here only affect future slot generation; slots
//! already persisted are never rewritten retroactively.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use slotbook_core::errors::SchedulerError;
use slotbook_core::models::opening_hours::{
    DayHours, OpeningHours, RemoveExceptionResponse, ScheduleException,
    UpsertOpeningHoursRequest, weekday_index,
};
use slotbook_db::repositories::{opening_hours, scheduler};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// Lists every configured weekday, with the exceptions falling on it.
#[axum::debug_handler]
pub async fn list_all(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<OpeningHours>>, AppError> {
    let rows = opening_hours::get_all(&state.db_pool)
        .await
        .map_err(SchedulerError::Database)?;
    let exceptions: Vec<ScheduleException> = opening_hours::list_exceptions(&state.db_pool)
        .await
        .map_err(SchedulerError::Database)?
        .into_iter()
        .map(|e| e.into_domain())
        .collect();

    let configs = rows
        .into_iter()
        .map(|row| {
            let weekday = row.weekday as u8;
            let for_day = exceptions
                .iter()
                .filter(|e| weekday_index(e.date) == weekday)
                .cloned()
                .collect();
            row.into_domain(for_day)
        })
        .collect();

    Ok(Json(configs))
}

/// One weekday's configuration, with the exceptions falling on it.
#[axum::debug_handler]
pub async fn get_by_weekday(
    State(state): State<Arc<ApiState>>,
    Path(weekday): Path<u8>,
) -> Result<Json<OpeningHours>, AppError> {
    let row = opening_hours::get_by_weekday(&state.db_pool, i16::from(weekday))
        .await
        .map_err(SchedulerError::Database)?
        .ok_or(SchedulerError::ConfigNotFound(weekday))?;

    let for_day = opening_hours::list_exceptions(&state.db_pool)
        .await
        .map_err(SchedulerError::Database)?
        .into_iter()
        .map(|e| e.into_domain())
        .filter(|e| weekday_index(e.date) == weekday)
        .collect();

    Ok(Json(row.into_domain(for_day)))
}

/// Replaces one weekday's configuration. Rejected when hours are
/// inverted or duration/capacity fall outside their bounds; nothing is
/// persisted in that case.
#[axum::debug_handler]
pub async fn upsert_weekday(
    State(state): State<Arc<ApiState>>,
    Path(weekday): Path<u8>,
    Json(payload): Json<UpsertOpeningHoursRequest>,
) -> Result<Json<OpeningHours>, AppError> {
    // Validate before touching the store
    let candidate = OpeningHours {
        id: Uuid::nil(),
        weekday,
        is_open: payload.is_open,
        hours: payload.hours,
        slot_duration_minutes: payload.slot_duration_minutes,
        orders_per_slot: payload.orders_per_slot,
        exceptions: Vec::new(),
    };
    candidate.validate()?;

    let row = opening_hours::upsert_weekday(&state.db_pool, i16::from(weekday), &payload)
        .await
        .map_err(SchedulerError::Database)?;

    Ok(Json(row.into_domain(Vec::new())))
}

/// Effective hours for one calendar date, exception included.
#[axum::debug_handler]
pub async fn hours_for_date(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DayHours>, AppError> {
    let resolved = scheduler::hours_for_date(&state.db_pool, query.date).await?;
    Ok(Json(resolved))
}

#[axum::debug_handler]
pub async fn list_exceptions(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ScheduleException>>, AppError> {
    let exceptions = opening_hours::list_exceptions(&state.db_pool)
        .await
        .map_err(SchedulerError::Database)?
        .into_iter()
        .map(|e| e.into_domain())
        .collect();

    Ok(Json(exceptions))
}

/// Adds an exception, replacing any existing entry for the same date.
#[axum::debug_handler]
pub async fn add_exception(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ScheduleException>,
) -> Result<Json<ScheduleException>, AppError> {
    payload.validate()?;

    let row = opening_hours::put_exception(&state.db_pool, &payload)
        .await
        .map_err(SchedulerError::Database)?;

    Ok(Json(row.into_domain()))
}

#[axum::debug_handler]
pub async fn remove_exception(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<RemoveExceptionResponse>, AppError> {
    let removed = opening_hours::remove_exception(&state.db_pool, date)
        .await
        .map_err(SchedulerError::Database)?;

    Ok(Json(RemoveExceptionResponse { removed }))
}
