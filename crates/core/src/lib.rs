//! # Slotbook Core
//!
//! Domain model for the pickup slot scheduling core: weekly opening-hours
//! configuration with date exceptions, fixed-duration time slots with
//! capacity bookkeeping, and the pure functions that derive slot state.
//!
//! This crate is free of I/O. Persistence lives in `slotbook-db` and the
//! HTTP surface in `slotbook-api`; both depend on the types and rules
//! defined here.

/// Error taxonomy shared by every layer
pub mod errors;
/// Domain models and the pure scheduling rules over them
pub mod models;
