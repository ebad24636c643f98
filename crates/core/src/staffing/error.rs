//! Staffing error types.

use thiserror::Error;

use fixora_shared::types::{BookingId, StaffId};

/// Errors that can occur during assignment bookkeeping.
#[derive(Debug, Error)]
pub enum StaffingError {
    /// The target staff member is BUSY and no override was granted.
    #[error("Staff {staff_id} is busy with an in-progress booking")]
    StaffBusy {
        /// The busy staff member.
        staff_id: StaffId,
    },

    /// The booking already has an active assignment.
    #[error("Booking {booking_id} already has an active assignment")]
    AlreadyAssigned {
        /// The booking in question.
        booking_id: BookingId,
    },

    /// No active assignment exists for the booking.
    #[error("Booking {booking_id} has no active assignment")]
    NoActiveAssignment {
        /// The booking in question.
        booking_id: BookingId,
    },
}

impl StaffingError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::StaffBusy { .. } | Self::AlreadyAssigned { .. } => 409,
            Self::NoActiveAssignment { .. } => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::StaffBusy { .. } => "STAFF_BUSY",
            Self::AlreadyAssigned { .. } => "ALREADY_ASSIGNED",
            Self::NoActiveAssignment { .. } => "NO_ACTIVE_ASSIGNMENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_busy_error() {
        let err = StaffingError::StaffBusy {
            staff_id: StaffId::new(),
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "STAFF_BUSY");
    }

    #[test]
    fn test_no_active_assignment_error() {
        let err = StaffingError::NoActiveAssignment {
            booking_id: BookingId::new(),
        };
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NO_ACTIVE_ASSIGNMENT");
    }
}
