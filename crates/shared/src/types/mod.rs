//! Common types used across the application.

pub mod clock;
pub mod id;

pub use clock::{minute_of_day, parse_hhmm};
pub use id::*;
