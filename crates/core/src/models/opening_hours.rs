use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SchedulerError, SchedulerResult};

pub const MIN_SLOT_DURATION_MINUTES: i32 = 5;
pub const MAX_SLOT_DURATION_MINUTES: i32 = 60;
pub const MIN_ORDERS_PER_SLOT: i32 = 1;
pub const MAX_ORDERS_PER_SLOT: i32 = 10;

/// Weekday index as stored in configuration: 0 = Sunday … 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Wall-clock open/close pair for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl HourRange {
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.close <= self.open {
            return Err(SchedulerError::InvalidRange(format!(
                "close time {} must be after open time {}",
                self.close.format("%H:%M"),
                self.open.format("%H:%M"),
            )));
        }
        Ok(())
    }
}

/// Calendar-date override of the weekly default: either fully closed or
/// open with custom hours. A non-closed exception without custom hours
/// falls back to the weekday default during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleException {
    pub date: NaiveDate,
    pub is_closed: bool,
    pub reason: Option<String>,
    pub custom_hours: Option<HourRange>,
}

impl ScheduleException {
    pub fn validate(&self) -> SchedulerResult<()> {
        if let Some(hours) = &self.custom_hours {
            hours.validate()?;
        }
        Ok(())
    }
}

/// Opening-hours policy for one weekday, with its date-keyed exceptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHours {
    pub id: Uuid,
    pub weekday: u8,
    pub is_open: bool,
    pub hours: Option<HourRange>,
    pub slot_duration_minutes: i32,
    pub orders_per_slot: i32,
    pub exceptions: Vec<ScheduleException>,
}

/// Result of resolving the opening hours for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayHours {
    Closed { reason: Option<String> },
    Open { hours: HourRange },
}

impl DayHours {
    pub fn is_open(&self) -> bool {
        matches!(self, DayHours::Open { .. })
    }
}

impl OpeningHours {
    /// Resolves the effective hours for `date`. An exact-date exception
    /// takes precedence over the weekday default.
    pub fn hours_for_date(&self, date: NaiveDate) -> DayHours {
        if let Some(exception) = self.exceptions.iter().find(|e| e.date == date) {
            if exception.is_closed {
                return DayHours::Closed {
                    reason: exception.reason.clone(),
                };
            }
            if let Some(hours) = exception.custom_hours {
                return DayHours::Open { hours };
            }
        }

        match (self.is_open, self.hours) {
            (true, Some(hours)) => DayHours::Open { hours },
            _ => DayHours::Closed { reason: None },
        }
    }

    /// Checks the invariants that must hold before this configuration may
    /// be persisted. Hour ranges (default and per-exception) must close
    /// after they open, and duration/capacity must stay within bounds.
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.weekday > 6 {
            return Err(SchedulerError::Validation(format!(
                "weekday must be 0-6, got {}",
                self.weekday
            )));
        }

        if !(MIN_SLOT_DURATION_MINUTES..=MAX_SLOT_DURATION_MINUTES)
            .contains(&self.slot_duration_minutes)
        {
            return Err(SchedulerError::Validation(format!(
                "slot duration must be between {} and {} minutes, got {}",
                MIN_SLOT_DURATION_MINUTES, MAX_SLOT_DURATION_MINUTES, self.slot_duration_minutes
            )));
        }

        if !(MIN_ORDERS_PER_SLOT..=MAX_ORDERS_PER_SLOT).contains(&self.orders_per_slot) {
            return Err(SchedulerError::Validation(format!(
                "orders per slot must be between {} and {}, got {}",
                MIN_ORDERS_PER_SLOT, MAX_ORDERS_PER_SLOT, self.orders_per_slot
            )));
        }

        match (self.is_open, &self.hours) {
            (true, None) => {
                return Err(SchedulerError::Validation(
                    "open weekday requires opening hours".to_string(),
                ));
            }
            (true, Some(hours)) => hours.validate()?,
            (false, _) => {}
        }

        for exception in &self.exceptions {
            exception.validate()?;
        }

        Ok(())
    }

    /// Adds an exception, replacing any existing entry for the same date.
    pub fn put_exception(&mut self, exception: ScheduleException) {
        self.exceptions.retain(|e| e.date != exception.date);
        self.exceptions.push(exception);
    }

    /// Drops the exception for `date`. Returns whether one existed.
    pub fn remove_exception(&mut self, date: NaiveDate) -> bool {
        let before = self.exceptions.len();
        self.exceptions.retain(|e| e.date != date);
        self.exceptions.len() != before
    }
}

/// Admin payload for replacing one weekday's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertOpeningHoursRequest {
    pub is_open: bool,
    pub hours: Option<HourRange>,
    pub slot_duration_minutes: i32,
    pub orders_per_slot: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveExceptionResponse {
    pub removed: bool,
}
