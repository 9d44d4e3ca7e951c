pub mod opening_hours;
pub mod scheduler;
pub mod time_slot;
