use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use slotbook_core::models::time_slot::TimeSlot;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbTimeSlot;

const SLOT_COLUMNS: &str =
    "id, slot_date, start_time, end_time, capacity, current_orders, status, created_at";

/// Inserts a slot window unless one already exists for the same
/// `(date, start, end)` tuple. Returns `None` when the window was already
/// present, which is what makes concurrent generation idempotent.
pub async fn insert_slot(pool: &Pool<Postgres>, slot: &TimeSlot) -> Result<Option<DbTimeSlot>> {
    let row = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        INSERT INTO time_slots (id, slot_date, start_time, end_time, capacity, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (slot_date, start_time, end_time) DO NOTHING
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(slot.id)
    .bind(slot.date)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(slot.capacity)
    .bind(slot.status.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let row = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn find_slot_window(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    start_time: NaiveTime,
) -> Result<Option<DbTimeSlot>> {
    let row = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE slot_date = $1 AND start_time = $2
        "#
    ))
    .bind(date)
    .bind(start_time)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn slots_for_date(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Vec<DbTimeSlot>> {
    let rows = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE slot_date = $1
        ORDER BY start_time ASC
        "#
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn slots_in_range(
    pool: &Pool<Postgres>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DbTimeSlot>> {
    let rows = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE slot_date >= $1 AND slot_date <= $2
        ORDER BY slot_date ASC, start_time ASC
        "#
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// First chronological slot on or after `from_date` that can still accept
/// an order. Manually closed slots never qualify.
pub async fn first_available_from(
    pool: &Pool<Postgres>,
    from_date: NaiveDate,
) -> Result<Option<DbTimeSlot>> {
    let row = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE slot_date >= $1
          AND status = 'active'
          AND current_orders < capacity
        ORDER BY slot_date ASC, start_time ASC
        LIMIT 1
        "#
    ))
    .bind(from_date)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn orders_for_slot(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT order_id
        FROM slot_orders
        WHERE slot_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(slot_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(order_id,)| order_id).collect())
}

pub async fn orders_for_slots(
    pool: &Pool<Postgres>,
    slot_ids: &[Uuid],
) -> Result<Vec<(Uuid, Uuid)>> {
    if slot_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
        r#"
        SELECT slot_id, order_id
        FROM slot_orders
        WHERE slot_id = ANY($1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(slot_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Outcome of a capacity-checked assignment attempt.
#[derive(Debug, Clone)]
pub enum AssignOutcome {
    Assigned(DbTimeSlot),
    /// The slot is full or manually closed.
    Unavailable,
    /// The order is already in this slot's order set.
    AlreadyAssigned,
}

/// Capacity-checked assignment as one atomic store operation: the counter
/// only moves where `current_orders < capacity`, so concurrent callers
/// cannot overfill a slot. The membership check runs in the same
/// transaction, so assigning an order twice never double-counts it.
pub async fn try_assign_order(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    order_id: Uuid,
) -> Result<AssignOutcome> {
    let mut tx = pool.begin().await?;

    let duplicate: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT 1
        FROM slot_orders
        WHERE slot_id = $1 AND order_id = $2
        "#,
    )
    .bind(slot_id)
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?;

    if duplicate.is_some() {
        tx.rollback().await?;
        return Ok(AssignOutcome::AlreadyAssigned);
    }

    let updated = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET current_orders = current_orders + 1,
            status = CASE
                WHEN current_orders + 1 >= capacity THEN 'full'
                ELSE 'active'
            END
        WHERE id = $1
          AND status = 'active'
          AND current_orders < capacity
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(slot_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(slot) = updated else {
        tx.rollback().await?;
        return Ok(AssignOutcome::Unavailable);
    };

    sqlx::query(
        r#"
        INSERT INTO slot_orders (slot_id, order_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(slot_id)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(AssignOutcome::Assigned(slot))
}

/// Removes one order from a slot and re-derives the counter and status in
/// the same transaction. Returns `None` when the order was not in the slot;
/// nothing is changed in that case.
pub async fn release_order(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    order_id: Uuid,
) -> Result<Option<DbTimeSlot>> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        r#"
        DELETE FROM slot_orders
        WHERE slot_id = $1 AND order_id = $2
        "#,
    )
    .bind(slot_id)
    .bind(order_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if removed == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    let slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET current_orders = current_orders - 1,
            status = CASE
                WHEN status = 'closed' THEN 'closed'
                WHEN current_orders - 1 >= capacity THEN 'full'
                ELSE 'active'
            END
        WHERE id = $1
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(slot_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(slot))
}

/// Manual admin close; conditional on the slot being empty so the rule
/// holds even when an order is assigned between check and write.
pub async fn close_slot(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<Option<DbTimeSlot>> {
    let row = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET status = 'closed'
        WHERE id = $1 AND current_orders = 0
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(slot_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn reopen_slot(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<Option<DbTimeSlot>> {
    let row = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET status = CASE
            WHEN current_orders >= capacity THEN 'full'
            ELSE 'active'
        END
        WHERE id = $1 AND status = 'closed'
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(slot_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Retention cleanup: drops every slot dated before `cutoff`, order rows
/// cascading with them. Returns the number of slots removed.
pub async fn delete_older_than(pool: &Pool<Postgres>, cutoff: NaiveDate) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE slot_date < $1
        "#,
    )
    .bind(cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
