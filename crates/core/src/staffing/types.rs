//! Assignment record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use fixora_shared::types::{BookingId, StaffId};

/// Status of a staff assignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// The staff member currently owns the booking.
    Active,
    /// Superseded by a reassignment transfer.
    Transferred,
    /// Released (cancellation, completion cleanup, or staff unlink).
    Removed,
}

impl AssignmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Transferred => "transferred",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A staff member's link to a booking.
///
/// At most one ACTIVE assignment exists per booking; superseded records
/// are retained in the ledger history for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAssignment {
    /// The assigned staff member.
    pub staff_id: StaffId,
    /// The booking being worked.
    pub booking_id: BookingId,
    /// Record status.
    pub status: AssignmentStatus,
    /// When the assignment was created.
    pub assigned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(AssignmentStatus::Active.as_str(), "active");
        assert_eq!(AssignmentStatus::Transferred.as_str(), "transferred");
        assert_eq!(AssignmentStatus::Removed.as_str(), "removed");
    }
}
