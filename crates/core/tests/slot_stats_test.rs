use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use pretty_assertions::assert_eq;
use rstest::rstest;
use slotbook_core::models::slot_stats::{compute_utilization, is_valid_order_time};
use slotbook_core::models::time_slot::TimeSlot;
use uuid::Uuid;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn slot_with_orders(capacity: i32, orders: usize) -> TimeSlot {
    let mut slot = TimeSlot::new(date(2025, 6, 3), time(18, 0), time(18, 10), capacity);
    for _ in 0..orders {
        slot.try_assign(Uuid::new_v4()).unwrap();
    }
    slot
}

#[test]
fn test_utilization_over_mixed_slots() {
    let slots = vec![
        slot_with_orders(2, 2),
        slot_with_orders(2, 1),
        slot_with_orders(2, 0),
    ];

    let stats = compute_utilization(&slots);

    assert_eq!(stats.total_slots, 3);
    assert_eq!(stats.available_slots, 2);
    assert_eq!(stats.full_slots, 1);
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.utilization_rate, 50.0);
}

#[test]
fn test_utilization_of_empty_range_is_zero() {
    let stats = compute_utilization(&[]);

    assert_eq!(stats.total_slots, 0);
    assert_eq!(stats.total_orders, 0);
    assert_eq!(stats.utilization_rate, 0.0);
}

#[test]
fn test_closed_slot_counts_neither_available_nor_full() {
    let mut closed = slot_with_orders(2, 0);
    closed.close().unwrap();

    let stats = compute_utilization(&[closed]);

    assert_eq!(stats.total_slots, 1);
    assert_eq!(stats.available_slots, 0);
    assert_eq!(stats.full_slots, 0);
}

fn now() -> NaiveDateTime {
    date(2025, 6, 3).and_time(time(12, 0))
}

#[rstest]
#[case(Duration::hours(1), true)]
#[case(Duration::days(6), true)]
#[case(Duration::days(7), true)]
#[case(Duration::zero(), false)]
#[case(Duration::days(8), false)]
#[case(-Duration::hours(1), false)]
fn test_order_time_window(#[case] offset: Duration, #[case] expected: bool) {
    let target = now() + offset;

    assert_eq!(
        is_valid_order_time(now(), target.date(), target.time()),
        expected
    );
}
