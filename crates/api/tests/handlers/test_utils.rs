use chrono::{NaiveDate, NaiveTime, Utc};
use slotbook_db::mock::repositories::{MockOpeningHoursRepo, MockTimeSlotRepo};
use slotbook_db::models::DbTimeSlot;
use uuid::Uuid;

pub struct TestContext {
    // Mocks for each repository touched by the scheduling flow
    pub opening_hours_repo: MockOpeningHoursRepo,
    pub time_slot_repo: MockTimeSlotRepo,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            opening_hours_repo: MockOpeningHoursRepo::new(),
            time_slot_repo: MockTimeSlotRepo::new(),
        }
    }
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn slot_row(slot_date: NaiveDate, start: NaiveTime, current_orders: i32) -> DbTimeSlot {
    DbTimeSlot {
        id: Uuid::new_v4(),
        slot_date,
        start_time: start,
        end_time: start + chrono::Duration::minutes(10),
        capacity: 2,
        current_orders,
        status: if current_orders >= 2 { "full" } else { "active" }.to_string(),
        created_at: Utc::now(),
    }
}
