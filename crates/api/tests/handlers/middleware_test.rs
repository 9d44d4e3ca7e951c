use axum::http::StatusCode;
use axum::response::IntoResponse;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use slotbook_api::middleware::error_handling::AppError;
use slotbook_core::errors::SchedulerError;
use uuid::Uuid;

async fn response_parts(err: SchedulerError) -> (StatusCode, Value) {
    let response = AppError(err).into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, body)
}

#[rstest]
#[case(SchedulerError::ConfigNotFound(3), StatusCode::NOT_FOUND, "config_not_found")]
#[case(
    SchedulerError::SlotNotFound("2025-06-03 18:00".into()),
    StatusCode::NOT_FOUND,
    "slot_not_found"
)]
#[case(
    SchedulerError::SlotUnavailable("full".into()),
    StatusCode::CONFLICT,
    "slot_unavailable"
)]
#[case(SchedulerError::NoSlotsAvailable, StatusCode::CONFLICT, "no_slots_available")]
#[case(
    SchedulerError::InvalidRange("close before open".into()),
    StatusCode::BAD_REQUEST,
    "invalid_range"
)]
#[case(
    SchedulerError::Validation("bad weekday".into()),
    StatusCode::BAD_REQUEST,
    "validation"
)]
#[tokio::test]
async fn test_error_status_mapping(
    #[case] err: SchedulerError,
    #[case] expected_status: StatusCode,
    #[case] expected_kind: &str,
) {
    let (status, body) = response_parts(err).await;

    assert_eq!(status, expected_status);
    assert_eq!(body["kind"], expected_kind);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_order_not_in_slot_maps_to_conflict() {
    let err = SchedulerError::OrderNotInSlot {
        order_id: Uuid::new_v4(),
        slot_id: Uuid::new_v4(),
    };
    let (status, body) = response_parts(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "order_not_in_slot");
}

#[tokio::test]
async fn test_database_error_maps_to_internal_server_error() {
    let (status, body) = response_parts(SchedulerError::Database(eyre::eyre!("down"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "database");
}

#[tokio::test]
async fn test_eyre_report_converts_through_app_error() {
    let err: AppError = eyre::eyre!("pool exhausted").into();
    let response = err.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
