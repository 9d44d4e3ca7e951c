//! # Error Handling Middleware
//!
//! Maps the scheduler's domain errors to HTTP status codes and JSON error
//! responses. Each response carries a machine-readable `kind` so the
//! checkout flow can choose between retry-with-another-slot and hard
//! failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotbook_core::errors::SchedulerError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `SchedulerError` instances and
/// implements `IntoResponse` to convert them into HTTP responses with
/// appropriate status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub SchedulerError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            SchedulerError::ConfigNotFound(_) | SchedulerError::SlotNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            SchedulerError::InvalidRange(_) | SchedulerError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            SchedulerError::SlotUnavailable(_)
            | SchedulerError::NoSlotsAvailable
            | SchedulerError::OrderNotInSlot { .. } => StatusCode::CONFLICT,
            SchedulerError::Database(_) | SchedulerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        }));

        (status, body).into_response()
    }
}

/// Allows using the `?` operator with functions returning
/// `Result<T, SchedulerError>` inside handlers returning
/// `Result<T, AppError>`.
impl From<SchedulerError> for AppError {
    fn from(err: SchedulerError) -> Self {
        AppError(err)
    }
}

/// Wraps raw repository errors in the `Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SchedulerError::Database(err))
    }
}
