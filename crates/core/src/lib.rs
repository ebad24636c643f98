//! Core business logic for Fixora.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state machines live here.
//!
//! # Modules
//!
//! - `schedule` - Bookable slot generation from provider working hours
//! - `booking` - Booking/payment/tracking lifecycle state machine
//! - `staffing` - Staff availability ledger and assignment bookkeeping
//! - `reassignment` - Staff-unlink transfer workflow
//! - `payout` - Staff payment split calculation and payment requests

pub mod booking;
pub mod payout;
pub mod reassignment;
pub mod schedule;
pub mod staffing;
