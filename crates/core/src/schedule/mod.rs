//! Bookable slot generation for Fixora.
//!
//! Turns a provider's configured working window (open/close, break, slot
//! duration) into the day's bookable slot inventory.
//!
//! # Modules
//!
//! - `types` - Working window and slot types
//! - `error` - Schedule-specific error types
//! - `service` - Slot generation logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ScheduleError;
pub use service::SlotGenerator;
pub use types::{Slot, SlotId, WorkingWindow};
