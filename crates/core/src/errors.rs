use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("No opening hours configured for weekday {0}")]
    ConfigNotFound(u8),

    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("No pickup slots available within the scheduling horizon")]
    NoSlotsAvailable,

    #[error("Order {order_id} is not assigned to slot {slot_id}")]
    OrderNotInSlot { order_id: Uuid, slot_id: Uuid },

    #[error("Invalid hour range: {0}")]
    InvalidRange(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SchedulerError {
    /// Stable machine-readable discriminant. Checkout uses this to decide
    /// between retry-with-another-slot and hard failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigNotFound(_) => "config_not_found",
            Self::SlotNotFound(_) => "slot_not_found",
            Self::SlotUnavailable(_) => "slot_unavailable",
            Self::NoSlotsAvailable => "no_slots_available",
            Self::OrderNotInSlot { .. } => "order_not_in_slot",
            Self::InvalidRange(_) => "invalid_range",
            Self::Validation(_) => "validation",
            Self::Database(_) => "database",
            Self::Internal(_) => "internal",
        }
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
