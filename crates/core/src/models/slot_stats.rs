use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::time_slot::{SCHEDULING_HORIZON_DAYS, SlotStatus, TimeSlot};

/// Read-side aggregation over a range of slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationStats {
    pub total_slots: usize,
    pub available_slots: usize,
    pub full_slots: usize,
    pub total_orders: i64,
    /// Orders placed as a percentage of total capacity offered; 0 when no
    /// capacity was offered at all.
    pub utilization_rate: f64,
}

pub fn compute_utilization(slots: &[TimeSlot]) -> UtilizationStats {
    let total_capacity: i64 = slots.iter().map(|s| i64::from(s.capacity)).sum();
    let total_orders: i64 = slots.iter().map(|s| i64::from(s.current_orders)).sum();

    let utilization_rate = if total_capacity == 0 {
        0.0
    } else {
        total_orders as f64 / total_capacity as f64 * 100.0
    };

    UtilizationStats {
        total_slots: slots.len(),
        available_slots: slots
            .iter()
            .filter(|s| s.is_available && s.status == SlotStatus::Active)
            .count(),
        full_slots: slots.iter().filter(|s| s.status == SlotStatus::Full).count(),
        total_orders,
        utilization_rate,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupRequest {
    /// Days of history to keep; falls back to the configured default.
    pub retention_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub removed: u64,
}

/// An order time is valid when it lies strictly in the future and no more
/// than the scheduling horizon ahead of `now`.
pub fn is_valid_order_time(now: NaiveDateTime, date: NaiveDate, start_time: NaiveTime) -> bool {
    let target = date.and_time(start_time);
    target > now && target <= now + Duration::days(SCHEDULING_HORIZON_DAYS)
}
