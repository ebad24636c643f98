//! Staff availability bookkeeping for Fixora.
//!
//! Tracks which staff member is assigned to which booking and derives
//! BUSY/AVAILABLE from the in-progress assignments.
//!
//! # Modules
//!
//! - `types` - Assignment record types
//! - `error` - Staffing-specific error types
//! - `ledger` - The availability ledger

pub mod error;
pub mod ledger;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use error::StaffingError;
pub use ledger::StaffAvailabilityLedger;
pub use types::{AssignmentStatus, StaffAssignment};
