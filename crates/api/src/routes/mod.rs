pub mod health;
pub mod opening_hours;
pub mod slots;
pub mod stats;
