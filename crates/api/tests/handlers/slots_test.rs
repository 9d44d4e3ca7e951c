use chrono::{NaiveDate, Utc};
use mockall::{Sequence, predicate};
use pretty_assertions::assert_eq;
use slotbook_api::middleware::error_handling::AppError;
use slotbook_core::errors::SchedulerError;
use slotbook_core::models::opening_hours::{DayHours, weekday_index};
use slotbook_core::models::time_slot::{TimeSlot, build_day_slots};
use slotbook_db::models::{DbOpeningHours, DbTimeSlot};
use slotbook_db::repositories::time_slot::AssignOutcome;
use uuid::Uuid;

use crate::test_utils::{TestContext, date, slot_row, time};

// Wrapper mirroring the next-available search against mocked repositories:
// a persisted candidate wins outright, otherwise the horizon is generated
// (closed days yield nothing) and the search runs once more.
async fn next_available_wrapper(
    ctx: &TestContext,
    from: NaiveDate,
) -> Result<Option<DbTimeSlot>, AppError> {
    if let Some(row) = ctx.time_slot_repo.first_available_from(from).await? {
        return Ok(Some(row));
    }

    for offset in 0..7 {
        let day = from + chrono::Duration::days(offset);
        let weekday = weekday_index(day);
        let Some(config) = ctx
            .opening_hours_repo
            .get_by_weekday(i16::from(weekday))
            .await?
        else {
            continue;
        };
        let resolved = config.into_domain(Vec::new()).hours_for_date(day);
        if !resolved.is_open() {
            continue;
        }
        // generation would insert windows here; the mocked store simply
        // reflects the outcome in the second search below
    }

    ctx.time_slot_repo
        .first_available_from(from)
        .await
        .map_err(Into::into)
}

// Wrapper mirroring day generation: build the windows from the weekday
// configuration and insert each one unless it already exists. Returns how
// many windows were actually created.
async fn generate_wrapper(ctx: &TestContext, day: NaiveDate) -> Result<usize, AppError> {
    let weekday = weekday_index(day);
    let Some(config) = ctx
        .opening_hours_repo
        .get_by_weekday(i16::from(weekday))
        .await?
    else {
        return Err(AppError(SchedulerError::ConfigNotFound(weekday)));
    };

    let duration = config.slot_duration_minutes;
    let capacity = config.orders_per_slot;
    let hours = match config.into_domain(Vec::new()).hours_for_date(day) {
        DayHours::Closed { .. } => return Ok(0),
        DayHours::Open { hours } => hours,
    };

    let mut created = 0;
    for slot in build_day_slots(day, hours, duration, capacity) {
        if ctx.time_slot_repo.insert_slot(slot).await?.is_some() {
            created += 1;
        }
    }
    Ok(created)
}

fn closed_weekday(weekday: i16) -> DbOpeningHours {
    DbOpeningHours {
        id: Uuid::new_v4(),
        weekday,
        is_open: false,
        open_time: None,
        close_time: None,
        slot_duration_minutes: 10,
        orders_per_slot: 2,
        created_at: Utc::now(),
    }
}

fn open_weekday(weekday: i16) -> DbOpeningHours {
    DbOpeningHours {
        id: Uuid::new_v4(),
        weekday,
        is_open: true,
        open_time: Some(time(18, 0)),
        close_time: Some(time(18, 30)),
        slot_duration_minutes: 10,
        orders_per_slot: 2,
        created_at: Utc::now(),
    }
}

fn row_from(slot: &TimeSlot) -> DbTimeSlot {
    DbTimeSlot {
        id: slot.id,
        slot_date: slot.date,
        start_time: slot.start_time,
        end_time: slot.end_time,
        capacity: slot.capacity,
        current_orders: slot.current_orders,
        status: slot.status.as_str().to_string(),
        created_at: slot.created_at,
    }
}

#[tokio::test]
async fn test_next_available_returns_first_persisted_candidate() {
    let mut ctx = TestContext::new();
    let from = date(2025, 6, 3);
    let candidate = slot_row(from, time(18, 0), 1);
    let expected_id = candidate.id;

    ctx.time_slot_repo
        .expect_first_available_from()
        .with(predicate::eq(from))
        .times(1)
        .returning(move |_| Ok(Some(candidate.clone())));

    let found = next_available_wrapper(&ctx, from).await.unwrap();
    assert_eq!(found.unwrap().id, expected_id);
}

#[tokio::test]
async fn test_next_available_is_none_when_every_day_is_closed() {
    let mut ctx = TestContext::new();
    let from = date(2025, 6, 3);

    ctx.time_slot_repo
        .expect_first_available_from()
        .with(predicate::eq(from))
        .times(2)
        .returning(|_| Ok(None));
    ctx.opening_hours_repo
        .expect_get_by_weekday()
        .times(7)
        .returning(|weekday| Ok(Some(closed_weekday(weekday))));

    let found = next_available_wrapper(&ctx, from).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_next_available_skips_unconfigured_weekdays() {
    let mut ctx = TestContext::new();
    let from = date(2025, 6, 3);

    ctx.time_slot_repo
        .expect_first_available_from()
        .times(2)
        .returning(|_| Ok(None));
    ctx.opening_hours_repo
        .expect_get_by_weekday()
        .times(7)
        .returning(|_| Ok(None));

    let found = next_available_wrapper(&ctx, from).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_next_available_moves_past_a_full_day() {
    let mut ctx = TestContext::new();
    let from = date(2025, 6, 3);
    let next_day = from + chrono::Duration::days(1);
    let candidate = slot_row(next_day, time(18, 0), 0);
    let expected_id = candidate.id;

    // First search finds nothing: every slot on `from` is full. After the
    // horizon is generated, the re-search lands on the next day's first slot.
    let mut seq = Sequence::new();
    ctx.time_slot_repo
        .expect_first_available_from()
        .with(predicate::eq(from))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(None));
    ctx.opening_hours_repo
        .expect_get_by_weekday()
        .times(7)
        .returning(|weekday| Ok(Some(open_weekday(weekday))));
    ctx.time_slot_repo
        .expect_first_available_from()
        .with(predicate::eq(from))
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(Some(candidate.clone())));

    let found = next_available_wrapper(&ctx, from)
        .await
        .unwrap()
        .expect("a slot on the next day should be found");
    assert_eq!(found.id, expected_id);
    assert_eq!(found.slot_date, next_day);
    assert_eq!(found.start_time, time(18, 0));
}

#[tokio::test]
async fn test_second_generation_pass_creates_no_new_slots() {
    let mut ctx = TestContext::new();
    let day = date(2025, 6, 3);
    let weekday = i16::from(weekday_index(day));

    ctx.opening_hours_repo
        .expect_get_by_weekday()
        .with(predicate::eq(weekday))
        .times(2)
        .returning(|weekday| Ok(Some(open_weekday(weekday))));

    // 18:00-18:30 at 10 minutes is three windows; on the second pass the
    // store already has every one of them
    let mut seq = Sequence::new();
    ctx.time_slot_repo
        .expect_insert_slot()
        .times(3)
        .in_sequence(&mut seq)
        .returning(|slot| Ok(Some(row_from(&slot))));
    ctx.time_slot_repo
        .expect_insert_slot()
        .times(3)
        .in_sequence(&mut seq)
        .returning(|_| Ok(None));

    assert_eq!(generate_wrapper(&ctx, day).await.unwrap(), 3);
    assert_eq!(generate_wrapper(&ctx, day).await.unwrap(), 0);
}

// Wrapper mirroring capacity-checked assignment: the conditional store
// update either returns the updated row or reports why it could not.
async fn assign_wrapper(
    ctx: &TestContext,
    slot_id: Uuid,
    order_id: Uuid,
) -> Result<DbTimeSlot, AppError> {
    match ctx.time_slot_repo.try_assign_order(slot_id, order_id).await? {
        AssignOutcome::Assigned(updated) => Ok(updated),
        AssignOutcome::Unavailable => Err(AppError(SchedulerError::SlotUnavailable(format!(
            "slot {slot_id} cannot accept more orders"
        )))),
        AssignOutcome::AlreadyAssigned => Err(AppError(SchedulerError::Validation(format!(
            "order {order_id} is already assigned to slot {slot_id}"
        )))),
    }
}

#[tokio::test]
async fn test_assignment_returns_updated_slot() {
    let mut ctx = TestContext::new();
    let slot = slot_row(date(2025, 6, 3), time(18, 0), 0);
    let slot_id = slot.id;
    let order_id = Uuid::new_v4();

    let updated = DbTimeSlot {
        current_orders: 1,
        ..slot
    };
    ctx.time_slot_repo
        .expect_try_assign_order()
        .with(predicate::eq(slot_id), predicate::eq(order_id))
        .times(1)
        .returning(move |_, _| Ok(AssignOutcome::Assigned(updated.clone())));

    let result = assign_wrapper(&ctx, slot_id, order_id).await.unwrap();
    assert_eq!(result.current_orders, 1);
}

#[tokio::test]
async fn test_assignment_against_full_slot_is_a_conflict() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    ctx.time_slot_repo
        .expect_try_assign_order()
        .times(1)
        .returning(|_, _| Ok(AssignOutcome::Unavailable));

    let result = assign_wrapper(&ctx, slot_id, Uuid::new_v4()).await;
    match result {
        Err(AppError(SchedulerError::SlotUnavailable(_))) => {}
        other => panic!("expected SlotUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_repeated_assignment_of_same_order_is_a_validation_error() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    ctx.time_slot_repo
        .expect_try_assign_order()
        .with(predicate::eq(slot_id), predicate::eq(order_id))
        .times(1)
        .returning(|_, _| Ok(AssignOutcome::AlreadyAssigned));

    let result = assign_wrapper(&ctx, slot_id, order_id).await;
    match result {
        Err(AppError(SchedulerError::Validation(_))) => {}
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_release_of_missing_order_reports_order_not_in_slot() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    ctx.time_slot_repo
        .expect_release_order()
        .with(predicate::eq(slot_id), predicate::eq(order_id))
        .times(1)
        .returning(|_, _| Ok(None));

    let released = ctx
        .time_slot_repo
        .release_order(slot_id, order_id)
        .await
        .unwrap();
    assert!(released.is_none());
}
