use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create opening_hours table, one row per weekday (0 = Sunday)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS opening_hours (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            weekday SMALLINT NOT NULL UNIQUE,
            is_open BOOLEAN NOT NULL DEFAULT FALSE,
            open_time TIME NULL,
            close_time TIME NULL,
            slot_duration_minutes INT NOT NULL,
            orders_per_slot INT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_weekday CHECK (weekday BETWEEN 0 AND 6),
            CONSTRAINT valid_slot_duration CHECK (slot_duration_minutes BETWEEN 5 AND 60),
            CONSTRAINT valid_orders_per_slot CHECK (orders_per_slot BETWEEN 1 AND 10),
            CONSTRAINT valid_default_hours CHECK (
                open_time IS NULL OR close_time IS NULL OR close_time > open_time
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_exceptions table, at most one override per calendar date
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_exceptions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            exception_date DATE NOT NULL UNIQUE,
            is_closed BOOLEAN NOT NULL DEFAULT FALSE,
            reason VARCHAR(255) NULL,
            open_time TIME NULL,
            close_time TIME NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_exception_hours CHECK (
                open_time IS NULL OR close_time IS NULL OR close_time > open_time
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table; the unique window constraint is what makes
    // concurrent lazy generation idempotent
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            capacity INT NOT NULL,
            current_orders INT NOT NULL DEFAULT 0,
            status VARCHAR(16) NOT NULL DEFAULT 'active',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_slot_window UNIQUE (slot_date, start_time, end_time),
            CONSTRAINT valid_slot_window CHECK (end_time > start_time),
            CONSTRAINT valid_capacity CHECK (capacity > 0),
            CONSTRAINT orders_within_capacity CHECK (
                current_orders >= 0 AND current_orders <= capacity
            ),
            CONSTRAINT valid_status CHECK (status IN ('active', 'full', 'closed'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slot_orders table holding the order-id set per slot
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slot_orders (
            slot_id UUID NOT NULL REFERENCES time_slots(id) ON DELETE CASCADE,
            order_id UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (slot_id, order_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_time_slots_slot_date ON time_slots(slot_date)",
        "CREATE INDEX IF NOT EXISTS idx_time_slots_date_start ON time_slots(slot_date, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_slot_orders_order_id ON slot_orders(order_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
