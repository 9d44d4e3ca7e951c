use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use slotbook_core::errors::{SchedulerError, SchedulerResult};
use slotbook_core::models::opening_hours::{DayHours, weekday_index};
use slotbook_core::models::slot_stats::{UtilizationStats, compute_utilization};
use slotbook_core::models::time_slot::{
    SCHEDULING_HORIZON_DAYS, SlotStatus, TimeSlot, build_day_slots,
};
use sqlx::{Pool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::DbTimeSlot;
use crate::repositories::time_slot::AssignOutcome;
use crate::repositories::{opening_hours, time_slot};

/// How often `assign_to_next_available` retries after losing the race for
/// a slot it had just found free.
const ASSIGN_RETRY_LIMIT: usize = 3;

/// Resolves the effective opening hours for one calendar date: the
/// date-keyed exception, if any, wins over the weekday default.
pub async fn hours_for_date(pool: &Pool<Postgres>, date: NaiveDate) -> SchedulerResult<DayHours> {
    let weekday = weekday_index(date);
    let row = opening_hours::get_by_weekday(pool, i16::from(weekday))
        .await
        .map_err(SchedulerError::Database)?
        .ok_or(SchedulerError::ConfigNotFound(weekday))?;

    let exceptions = opening_hours::get_exception(pool, date)
        .await
        .map_err(SchedulerError::Database)?
        .map(|e| e.into_domain())
        .into_iter()
        .collect();

    Ok(row.into_domain(exceptions).hours_for_date(date))
}

/// Generates the slots for one day and returns every slot persisted for
/// that date afterwards. A closed day yields an empty list; a weekday with
/// no configuration at all is an error. Re-running for the same date only
/// creates the windows that are still missing.
pub async fn generate_for_day(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> SchedulerResult<Vec<TimeSlot>> {
    let weekday = weekday_index(date);
    let row = opening_hours::get_by_weekday(pool, i16::from(weekday))
        .await
        .map_err(SchedulerError::Database)?
        .ok_or(SchedulerError::ConfigNotFound(weekday))?;

    let duration = row.slot_duration_minutes;
    let capacity = row.orders_per_slot;

    let exceptions = opening_hours::get_exception(pool, date)
        .await
        .map_err(SchedulerError::Database)?
        .map(|e| e.into_domain())
        .into_iter()
        .collect();

    let hours = match row.into_domain(exceptions).hours_for_date(date) {
        DayHours::Closed { reason } => {
            debug!(%date, ?reason, "day is closed, no slots generated");
            return Ok(Vec::new());
        }
        DayHours::Open { hours } => hours,
    };

    let mut created = 0usize;
    for slot in build_day_slots(date, hours, duration, capacity) {
        if time_slot::insert_slot(pool, &slot)
            .await
            .map_err(SchedulerError::Database)?
            .is_some()
        {
            created += 1;
        }
    }
    if created > 0 {
        info!(%date, created, "generated pickup slots");
    }

    let rows = time_slot::slots_for_date(pool, date)
        .await
        .map_err(SchedulerError::Database)?;
    with_orders(pool, rows).await
}

/// First chronological slot with remaining capacity on or after
/// `from_date`. When nothing persisted qualifies, slots are lazily
/// generated over the scheduling horizon (closed and unconfigured days
/// skipped) and the search runs once more.
pub async fn find_next_available(
    pool: &Pool<Postgres>,
    from_date: NaiveDate,
) -> SchedulerResult<Option<TimeSlot>> {
    if let Some(row) = time_slot::first_available_from(pool, from_date)
        .await
        .map_err(SchedulerError::Database)?
    {
        return Ok(Some(one_with_orders(pool, row).await?));
    }

    for offset in 0..SCHEDULING_HORIZON_DAYS {
        let date = from_date + Duration::days(offset);
        match generate_for_day(pool, date).await {
            Ok(_) => {}
            // a weekday with no configuration cannot offer slots; keep
            // searching the rest of the horizon
            Err(SchedulerError::ConfigNotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    match time_slot::first_available_from(pool, from_date)
        .await
        .map_err(SchedulerError::Database)?
    {
        Some(row) => Ok(Some(one_with_orders(pool, row).await?)),
        None => Ok(None),
    }
}

/// Assigns an order to the slot starting at `(date, start_time)`.
pub async fn assign(
    pool: &Pool<Postgres>,
    order_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
) -> SchedulerResult<TimeSlot> {
    let row = time_slot::find_slot_window(pool, date, start_time)
        .await
        .map_err(SchedulerError::Database)?
        .ok_or_else(|| {
            SchedulerError::SlotNotFound(format!("{date} {}", start_time.format("%H:%M")))
        })?;

    match time_slot::try_assign_order(pool, row.id, order_id)
        .await
        .map_err(SchedulerError::Database)?
    {
        AssignOutcome::Assigned(updated) => {
            info!(slot_id = %updated.id, %order_id, "order assigned to slot");
            one_with_orders(pool, updated).await
        }
        AssignOutcome::Unavailable => Err(SchedulerError::SlotUnavailable(format!(
            "slot on {date} at {} cannot accept more orders",
            start_time.format("%H:%M")
        ))),
        AssignOutcome::AlreadyAssigned => Err(SchedulerError::Validation(format!(
            "order {order_id} is already assigned to the slot on {date} at {}",
            start_time.format("%H:%M")
        ))),
    }
}

/// Finds the next available slot and assigns the order to it. The found
/// slot can fill between the search and the write, so the pair is retried
/// a few times before giving up.
pub async fn assign_to_next_available(
    pool: &Pool<Postgres>,
    order_id: Uuid,
    from_date: NaiveDate,
) -> SchedulerResult<TimeSlot> {
    for _ in 0..ASSIGN_RETRY_LIMIT {
        let Some(slot) = find_next_available(pool, from_date).await? else {
            return Err(SchedulerError::NoSlotsAvailable);
        };

        match time_slot::try_assign_order(pool, slot.id, order_id)
            .await
            .map_err(SchedulerError::Database)?
        {
            AssignOutcome::Assigned(updated) => {
                info!(slot_id = %updated.id, %order_id, "order assigned to next available slot");
                return one_with_orders(pool, updated).await;
            }
            AssignOutcome::AlreadyAssigned => {
                return Err(SchedulerError::Validation(format!(
                    "order {order_id} is already assigned to slot {}",
                    slot.id
                )));
            }
            AssignOutcome::Unavailable => {
                debug!(slot_id = %slot.id, "slot filled while assigning, retrying");
            }
        }
    }

    Err(SchedulerError::NoSlotsAvailable)
}

/// Releases an order from a slot, re-deriving its counter and status.
pub async fn release(
    pool: &Pool<Postgres>,
    order_id: Uuid,
    slot_id: Uuid,
) -> SchedulerResult<TimeSlot> {
    time_slot::get_slot(pool, slot_id)
        .await
        .map_err(SchedulerError::Database)?
        .ok_or_else(|| SchedulerError::SlotNotFound(slot_id.to_string()))?;

    match time_slot::release_order(pool, slot_id, order_id)
        .await
        .map_err(SchedulerError::Database)?
    {
        Some(updated) => {
            info!(%slot_id, %order_id, "order released from slot");
            one_with_orders(pool, updated).await
        }
        None => Err(SchedulerError::OrderNotInSlot { order_id, slot_id }),
    }
}

/// Manual admin close. Only an empty slot may be closed; the rule is
/// enforced here, not left to the calling surface.
pub async fn close_slot(pool: &Pool<Postgres>, slot_id: Uuid) -> SchedulerResult<TimeSlot> {
    let row = time_slot::get_slot(pool, slot_id)
        .await
        .map_err(SchedulerError::Database)?
        .ok_or_else(|| SchedulerError::SlotNotFound(slot_id.to_string()))?;

    if row.current_orders > 0 {
        return Err(SchedulerError::Validation(format!(
            "cannot close slot {slot_id} while {} order(s) are assigned",
            row.current_orders
        )));
    }

    match time_slot::close_slot(pool, slot_id)
        .await
        .map_err(SchedulerError::Database)?
    {
        Some(updated) => one_with_orders(pool, updated).await,
        // an order landed between the check and the write
        None => Err(SchedulerError::SlotUnavailable(format!(
            "slot {slot_id} received orders while closing"
        ))),
    }
}

pub async fn reopen_slot(pool: &Pool<Postgres>, slot_id: Uuid) -> SchedulerResult<TimeSlot> {
    let row = time_slot::get_slot(pool, slot_id)
        .await
        .map_err(SchedulerError::Database)?
        .ok_or_else(|| SchedulerError::SlotNotFound(slot_id.to_string()))?;

    if row.status != SlotStatus::Closed.as_str() {
        return Err(SchedulerError::Validation(format!(
            "slot {slot_id} is not closed"
        )));
    }

    match time_slot::reopen_slot(pool, slot_id)
        .await
        .map_err(SchedulerError::Database)?
    {
        Some(updated) => one_with_orders(pool, updated).await,
        None => Err(SchedulerError::SlotNotFound(slot_id.to_string())),
    }
}

/// Slots still accepting orders on `date`, generating the day first when
/// nothing is persisted for it yet. Sorted by start time.
pub async fn available_slots_for_date(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> SchedulerResult<Vec<TimeSlot>> {
    let mut rows = time_slot::slots_for_date(pool, date)
        .await
        .map_err(SchedulerError::Database)?;
    if rows.is_empty() {
        return Ok(generate_for_day(pool, date)
            .await?
            .into_iter()
            .filter(|s| s.is_available && s.status == SlotStatus::Active)
            .collect());
    }

    rows.retain(|r| r.status == SlotStatus::Active.as_str() && r.current_orders < r.capacity);
    with_orders(pool, rows).await
}

/// Inclusive range scan, optionally narrowed to slots still accepting
/// orders. Ordered by date, then start time.
pub async fn slots_by_range(
    pool: &Pool<Postgres>,
    start: NaiveDate,
    end: NaiveDate,
    only_available: bool,
) -> SchedulerResult<Vec<TimeSlot>> {
    let mut rows = time_slot::slots_in_range(pool, start, end)
        .await
        .map_err(SchedulerError::Database)?;

    if only_available {
        rows.retain(|r| r.status == SlotStatus::Active.as_str() && r.current_orders < r.capacity);
    }

    with_orders(pool, rows).await
}

/// Utilization over an inclusive date range.
pub async fn utilization(
    pool: &Pool<Postgres>,
    start: NaiveDate,
    end: NaiveDate,
) -> SchedulerResult<UtilizationStats> {
    let slots = slots_by_range(pool, start, end, false).await?;
    Ok(compute_utilization(&slots))
}

/// Deletes every slot dated before `today - retention_days`. Returns the
/// number of slots removed.
pub async fn cleanup_old_slots(pool: &Pool<Postgres>, retention_days: i64) -> SchedulerResult<u64> {
    let cutoff = Utc::now().date_naive() - Duration::days(retention_days);
    let removed = time_slot::delete_older_than(pool, cutoff)
        .await
        .map_err(SchedulerError::Database)?;

    if removed > 0 {
        info!(%cutoff, removed, "cleaned up expired pickup slots");
    }
    Ok(removed)
}

/// Whether an order may still be placed for the given slot time.
pub fn is_valid_order_time(date: NaiveDate, start_time: NaiveTime) -> bool {
    slotbook_core::models::slot_stats::is_valid_order_time(
        Utc::now().naive_utc(),
        date,
        start_time,
    )
}

async fn one_with_orders(pool: &Pool<Postgres>, row: DbTimeSlot) -> SchedulerResult<TimeSlot> {
    let orders = time_slot::orders_for_slot(pool, row.id)
        .await
        .map_err(SchedulerError::Database)?;
    row.into_domain(orders).map_err(SchedulerError::Database)
}

async fn with_orders(
    pool: &Pool<Postgres>,
    rows: Vec<DbTimeSlot>,
) -> SchedulerResult<Vec<TimeSlot>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let pairs = time_slot::orders_for_slots(pool, &ids)
        .await
        .map_err(SchedulerError::Database)?;

    let mut by_slot: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (slot_id, order_id) in pairs {
        by_slot.entry(slot_id).or_default().push(order_id);
    }

    rows.into_iter()
        .map(|row| {
            let orders = by_slot.remove(&row.id).unwrap_or_default();
            row.into_domain(orders).map_err(SchedulerError::Database)
        })
        .collect()
}
