//! Booking lifecycle management for Fixora.
//!
//! This module implements the joint booking/payment/tracking state
//! machine and the action eligibility derived from it.
//!
//! # Modules
//!
//! - `types` - Booking domain types (statuses, state triple, transitions)
//! - `error` - Booking-specific error types
//! - `service` - State transition logic
//! - `actions` - Table-driven action eligibility for the dashboards

pub mod actions;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use actions::BookingActions;
pub use error::{BookingError, TransitionKind};
pub use service::BookingService;
pub use types::{
    Booking, BookingState, BookingStatus, BookingTransition, PaymentStatus, TrackingStatus,
};
