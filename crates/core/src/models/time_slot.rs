use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SchedulerError, SchedulerResult};
use crate::models::opening_hours::HourRange;

/// How far ahead, in days, lazy generation and order-time validation reach.
pub const SCHEDULING_HORIZON_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Active,
    Full,
    Closed,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Active => "active",
            SlotStatus::Full => "full",
            SlotStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SlotStatus::Active),
            "full" => Ok(SlotStatus::Full),
            "closed" => Ok(SlotStatus::Closed),
            other => Err(SchedulerError::Validation(format!(
                "unknown slot status: {other}"
            ))),
        }
    }
}

/// A fixed-duration pickup window on one calendar date, holding up to
/// `capacity` orders. `current_orders`, `status`, and `is_available` are
/// derived from the order set by [`TimeSlot::recompute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub current_orders: i32,
    pub orders: Vec<Uuid>,
    pub is_available: bool,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime, capacity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            start_time,
            end_time,
            capacity,
            current_orders: 0,
            orders: Vec::new(),
            is_available: true,
            status: SlotStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Re-derives `current_orders`, `status`, and `is_available` from the
    /// order set. This is the single place the derivation rules live; every
    /// mutation path calls it before handing the slot back.
    ///
    /// A manually closed slot keeps its status and stays unavailable no
    /// matter how much capacity remains.
    pub fn recompute(&mut self) {
        self.current_orders = self.orders.len() as i32;

        if self.status != SlotStatus::Closed {
            self.status = if self.current_orders >= self.capacity {
                SlotStatus::Full
            } else {
                SlotStatus::Active
            };
        }

        self.is_available =
            self.status == SlotStatus::Active && self.current_orders < self.capacity;
    }

    pub fn can_accept_order(&self) -> bool {
        self.is_available
            && self.status == SlotStatus::Active
            && self.current_orders < self.capacity
    }

    /// Capacity-checked assignment. The check and the mutation happen
    /// together; callers holding exclusive access to the slot (a lock, or a
    /// conditional store update expressing the same predicate) cannot
    /// overfill it.
    pub fn try_assign(&mut self, order_id: Uuid) -> SchedulerResult<()> {
        if !self.can_accept_order() {
            return Err(SchedulerError::SlotUnavailable(format!(
                "slot {} on {} at {} cannot accept more orders",
                self.id,
                self.date,
                self.start_time.format("%H:%M"),
            )));
        }
        if self.orders.contains(&order_id) {
            return Err(SchedulerError::Validation(format!(
                "order {order_id} is already assigned to this slot"
            )));
        }

        self.orders.push(order_id);
        self.recompute();
        Ok(())
    }

    /// Removes `order_id` and re-derives state. A full slot transitions
    /// back to active unless it was manually closed.
    pub fn release(&mut self, order_id: Uuid) -> SchedulerResult<()> {
        let Some(pos) = self.orders.iter().position(|o| *o == order_id) else {
            return Err(SchedulerError::OrderNotInSlot {
                order_id,
                slot_id: self.id,
            });
        };

        self.orders.remove(pos);
        self.recompute();
        Ok(())
    }

    /// Manual admin close. Refused while any order is still assigned, so
    /// the invariant holds regardless of the caller.
    pub fn close(&mut self) -> SchedulerResult<()> {
        if self.current_orders > 0 {
            return Err(SchedulerError::Validation(format!(
                "cannot close slot {} while {} order(s) are assigned",
                self.id, self.current_orders
            )));
        }
        self.status = SlotStatus::Closed;
        self.is_available = false;
        Ok(())
    }

    /// Manual admin reopen; only meaningful from `closed`.
    pub fn reopen(&mut self) {
        if self.status == SlotStatus::Closed {
            self.status = SlotStatus::Active;
            self.recompute();
        }
    }
}

/// Steps from `open` to `close` in `duration_minutes` increments. A
/// trailing window that would overrun `close` is not emitted, and a
/// non-positive duration yields nothing.
pub fn slot_windows(hours: HourRange, duration_minutes: i32) -> Vec<HourRange> {
    let mut windows = Vec::new();
    if duration_minutes <= 0 {
        return windows;
    }

    let step = Duration::minutes(i64::from(duration_minutes));
    let mut start = hours.open;
    loop {
        let (end, wrapped) = start.overflowing_add_signed(step);
        // wrapping past midnight ends the day
        if wrapped != 0 || end > hours.close {
            break;
        }
        windows.push(HourRange {
            open: start,
            close: end,
        });
        if end == hours.close {
            break;
        }
        start = end;
    }

    windows
}

/// Builds fresh slots for every window of one open day.
pub fn build_day_slots(
    date: NaiveDate,
    hours: HourRange,
    duration_minutes: i32,
    capacity: i32,
) -> Vec<TimeSlot> {
    slot_windows(hours, duration_minutes)
        .into_iter()
        .map(|window| TimeSlot::new(date, window.open, window.close, capacity))
        .collect()
}

// Request/response payloads for the checkout-facing slot endpoints.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignSlotRequest {
    pub order_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignNextRequest {
    pub order_id: Uuid,
    pub from_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSlotRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextAvailableResponse {
    pub slot: Option<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOrderTimeResponse {
    pub valid: bool,
}
