use chrono::NaiveDate;
use eyre::Result;
use slotbook_core::models::opening_hours::{ScheduleException, UpsertOpeningHoursRequest};
use sqlx::{Pool, Postgres};

use crate::models::{DbOpeningHours, DbScheduleException};

pub async fn get_by_weekday(
    pool: &Pool<Postgres>,
    weekday: i16,
) -> Result<Option<DbOpeningHours>> {
    let config = sqlx::query_as::<_, DbOpeningHours>(
        r#"
        SELECT id, weekday, is_open, open_time, close_time,
               slot_duration_minutes, orders_per_slot, created_at
        FROM opening_hours
        WHERE weekday = $1
        "#,
    )
    .bind(weekday)
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

pub async fn get_all(pool: &Pool<Postgres>) -> Result<Vec<DbOpeningHours>> {
    let configs = sqlx::query_as::<_, DbOpeningHours>(
        r#"
        SELECT id, weekday, is_open, open_time, close_time,
               slot_duration_minutes, orders_per_slot, created_at
        FROM opening_hours
        ORDER BY weekday ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(configs)
}

pub async fn upsert_weekday(
    pool: &Pool<Postgres>,
    weekday: i16,
    config: &UpsertOpeningHoursRequest,
) -> Result<DbOpeningHours> {
    let (open_time, close_time) = match config.hours {
        Some(hours) => (Some(hours.open), Some(hours.close)),
        None => (None, None),
    };

    let row = sqlx::query_as::<_, DbOpeningHours>(
        r#"
        INSERT INTO opening_hours
            (weekday, is_open, open_time, close_time, slot_duration_minutes, orders_per_slot)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (weekday) DO UPDATE SET
            is_open = EXCLUDED.is_open,
            open_time = EXCLUDED.open_time,
            close_time = EXCLUDED.close_time,
            slot_duration_minutes = EXCLUDED.slot_duration_minutes,
            orders_per_slot = EXCLUDED.orders_per_slot
        RETURNING id, weekday, is_open, open_time, close_time,
                  slot_duration_minutes, orders_per_slot, created_at
        "#,
    )
    .bind(weekday)
    .bind(config.is_open)
    .bind(open_time)
    .bind(close_time)
    .bind(config.slot_duration_minutes)
    .bind(config.orders_per_slot)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_exception(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> Result<Option<DbScheduleException>> {
    let exception = sqlx::query_as::<_, DbScheduleException>(
        r#"
        SELECT id, exception_date, is_closed, reason, open_time, close_time, created_at
        FROM schedule_exceptions
        WHERE exception_date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(exception)
}

pub async fn list_exceptions(pool: &Pool<Postgres>) -> Result<Vec<DbScheduleException>> {
    let exceptions = sqlx::query_as::<_, DbScheduleException>(
        r#"
        SELECT id, exception_date, is_closed, reason, open_time, close_time, created_at
        FROM schedule_exceptions
        ORDER BY exception_date ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(exceptions)
}

/// Inserts an exception, replacing any existing entry for the same date.
pub async fn put_exception(
    pool: &Pool<Postgres>,
    exception: &ScheduleException,
) -> Result<DbScheduleException> {
    let (open_time, close_time) = match exception.custom_hours {
        Some(hours) => (Some(hours.open), Some(hours.close)),
        None => (None, None),
    };

    let row = sqlx::query_as::<_, DbScheduleException>(
        r#"
        INSERT INTO schedule_exceptions
            (exception_date, is_closed, reason, open_time, close_time)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (exception_date) DO UPDATE SET
            is_closed = EXCLUDED.is_closed,
            reason = EXCLUDED.reason,
            open_time = EXCLUDED.open_time,
            close_time = EXCLUDED.close_time
        RETURNING id, exception_date, is_closed, reason, open_time, close_time, created_at
        "#,
    )
    .bind(exception.date)
    .bind(exception.is_closed)
    .bind(&exception.reason)
    .bind(open_time)
    .bind(close_time)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn remove_exception(pool: &Pool<Postgres>, date: NaiveDate) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM schedule_exceptions
        WHERE exception_date = $1
        "#,
    )
    .bind(date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
