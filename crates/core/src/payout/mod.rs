//! Staff payout calculation for Fixora.
//!
//! Computes the staff/platform split for completed, paid bookings and
//! owns the payment-request status transitions.
//!
//! # Modules
//!
//! - `types` - Payment request and split types
//! - `error` - Payout-specific error types
//! - `service` - Split calculation and request transitions

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::PayoutError;
pub use service::PayoutService;
pub use types::{PaymentRequest, PaymentRequestStatus, PaymentSplit};
