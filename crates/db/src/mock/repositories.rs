use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use slotbook_core::models::time_slot::TimeSlot;
use uuid::Uuid;

use crate::models::{DbOpeningHours, DbScheduleException, DbTimeSlot};
use crate::repositories::time_slot::AssignOutcome;

// Mock repositories for testing

mock! {
    pub OpeningHoursRepo {
        pub async fn get_by_weekday(
            &self,
            weekday: i16,
        ) -> eyre::Result<Option<DbOpeningHours>>;

        pub async fn get_exception(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<Option<DbScheduleException>>;

        pub async fn remove_exception(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub TimeSlotRepo {
        pub async fn insert_slot(
            &self,
            slot: TimeSlot,
        ) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn find_slot_window(
            &self,
            date: NaiveDate,
            start_time: NaiveTime,
        ) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn first_available_from(
            &self,
            from_date: NaiveDate,
        ) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn slots_for_date(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbTimeSlot>>;

        pub async fn try_assign_order(
            &self,
            slot_id: Uuid,
            order_id: Uuid,
        ) -> eyre::Result<AssignOutcome>;

        pub async fn release_order(
            &self,
            slot_id: Uuid,
            order_id: Uuid,
        ) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn delete_older_than(
            &self,
            cutoff: NaiveDate,
        ) -> eyre::Result<u64>;
    }
}
