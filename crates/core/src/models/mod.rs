pub mod opening_hours;
pub mod slot_stats;
pub mod time_slot;
