use std::error::Error;

use slotbook_core::errors::{SchedulerError, SchedulerResult};
use uuid::Uuid;

#[test]
fn test_scheduler_error_display() {
    let config_not_found = SchedulerError::ConfigNotFound(2);
    let slot_not_found = SchedulerError::SlotNotFound("2025-06-03 18:00".to_string());
    let slot_unavailable = SchedulerError::SlotUnavailable("capacity exhausted".to_string());
    let no_slots = SchedulerError::NoSlotsAvailable;
    let invalid_range = SchedulerError::InvalidRange("close before open".to_string());
    let validation = SchedulerError::Validation("bad input".to_string());
    let database = SchedulerError::Database(eyre::eyre!("connection refused"));

    assert_eq!(
        config_not_found.to_string(),
        "No opening hours configured for weekday 2"
    );
    assert_eq!(
        slot_not_found.to_string(),
        "Slot not found: 2025-06-03 18:00"
    );
    assert_eq!(
        slot_unavailable.to_string(),
        "Slot unavailable: capacity exhausted"
    );
    assert_eq!(
        no_slots.to_string(),
        "No pickup slots available within the scheduling horizon"
    );
    assert_eq!(
        invalid_range.to_string(),
        "Invalid hour range: close before open"
    );
    assert_eq!(validation.to_string(), "Validation error: bad input");
    assert!(database.to_string().contains("Database error:"));
}

#[test]
fn test_order_not_in_slot_reports_both_ids() {
    let order_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let err = SchedulerError::OrderNotInSlot { order_id, slot_id };

    let message = err.to_string();
    assert!(message.contains(&order_id.to_string()));
    assert!(message.contains(&slot_id.to_string()));
}

#[test]
fn test_error_kinds_are_distinct() {
    let errors = [
        SchedulerError::ConfigNotFound(0),
        SchedulerError::SlotNotFound(String::new()),
        SchedulerError::SlotUnavailable(String::new()),
        SchedulerError::NoSlotsAvailable,
        SchedulerError::OrderNotInSlot {
            order_id: Uuid::new_v4(),
            slot_id: Uuid::new_v4(),
        },
        SchedulerError::InvalidRange(String::new()),
        SchedulerError::Validation(String::new()),
        SchedulerError::Database(eyre::eyre!("db")),
    ];

    let mut kinds: Vec<_> = errors.iter().map(SchedulerError::kind).collect();
    kinds.sort_unstable();
    kinds.dedup();
    assert_eq!(kinds.len(), errors.len());
}

#[test]
fn test_scheduler_result_alias() {
    let ok: SchedulerResult<i32> = Ok(42);
    assert_eq!(ok.unwrap(), 42);

    let err: SchedulerResult<i32> = Err(SchedulerError::NoSlotsAvailable);
    assert!(err.is_err());
}

#[test]
fn test_internal_error_preserves_source() {
    let io_error = std::io::Error::other("disk on fire");
    let err = SchedulerError::Internal(Box::new(io_error));

    assert!(err.source().is_some());
    assert!(err.to_string().contains("disk on fire"));
}

#[test]
fn test_database_error_wraps_eyre_report() {
    let report = eyre::eyre!("pool exhausted");
    let err: SchedulerError = report.into();

    assert_eq!(err.kind(), "database");
}
