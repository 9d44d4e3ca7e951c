use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use slotbook_core::models::opening_hours::{
    HourRange, OpeningHours, ScheduleException,
};
use slotbook_core::models::time_slot::{SlotStatus, TimeSlot};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOpeningHours {
    pub id: Uuid,
    pub weekday: i16,
    pub is_open: bool,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub slot_duration_minutes: i32,
    pub orders_per_slot: i32,
    pub created_at: DateTime<Utc>,
}

impl DbOpeningHours {
    /// Lifts the row into the domain model, attaching the exceptions
    /// relevant to the caller (usually just the one for the date at hand).
    pub fn into_domain(self, exceptions: Vec<ScheduleException>) -> OpeningHours {
        let hours = match (self.open_time, self.close_time) {
            (Some(open), Some(close)) => Some(HourRange { open, close }),
            _ => None,
        };

        OpeningHours {
            id: self.id,
            weekday: self.weekday as u8,
            is_open: self.is_open,
            hours,
            slot_duration_minutes: self.slot_duration_minutes,
            orders_per_slot: self.orders_per_slot,
            exceptions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleException {
    pub id: Uuid,
    pub exception_date: NaiveDate,
    pub is_closed: bool,
    pub reason: Option<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl DbScheduleException {
    pub fn into_domain(self) -> ScheduleException {
        let custom_hours = match (self.open_time, self.close_time) {
            (Some(open), Some(close)) => Some(HourRange { open, close }),
            _ => None,
        };

        ScheduleException {
            date: self.exception_date,
            is_closed: self.is_closed,
            reason: self.reason,
            custom_hours,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub current_orders: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbTimeSlot {
    /// Lifts the row into the domain model with its order set attached.
    /// `is_available` is derived here rather than stored.
    pub fn into_domain(self, orders: Vec<Uuid>) -> Result<TimeSlot> {
        let status: SlotStatus = self
            .status
            .parse()
            .map_err(|e| eyre::eyre!("corrupt slot row {}: {e}", self.id))?;

        Ok(TimeSlot {
            id: self.id,
            date: self.slot_date,
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity,
            current_orders: self.current_orders,
            orders,
            is_available: status == SlotStatus::Active && self.current_orders < self.capacity,
            status,
            created_at: self.created_at,
        })
    }
}
