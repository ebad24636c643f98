//! Structured engine error surface.
//!
//! Collaborators receive error kinds plus human-readable text, never raw
//! exceptions; every domain error keeps its own code and status.

use chrono::NaiveDate;
use thiserror::Error;

use fixora_core::booking::BookingError;
use fixora_core::payout::PayoutError;
use fixora_core::reassignment::ReassignmentError;
use fixora_core::schedule::{ScheduleError, SlotId};
use fixora_core::staffing::StaffingError;
use fixora_shared::types::{BookingId, BusinessId, StaffId};

/// Result type alias using `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the booking engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Working-window configuration problem.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Booking lifecycle violation.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Assignment ledger violation.
    #[error(transparent)]
    Staffing(#[from] StaffingError),

    /// Staff-unlink workflow violation.
    #[error(transparent)]
    Reassignment(#[from] ReassignmentError),

    /// Payout violation.
    #[error(transparent)]
    Payout(#[from] PayoutError),

    /// Booking does not exist.
    #[error("Booking {0} not found")]
    BookingNotFound(BookingId),

    /// No payment request exists for the booking.
    #[error("Payment request for booking {0} not found")]
    PaymentRequestNotFound(BookingId),

    /// A payment request already exists for the booking.
    #[error("Payment request for booking {0} already exists")]
    PaymentRequestExists(BookingId),

    /// The business has not configured working hours.
    #[error("No working window configured for business {0}")]
    WindowNotConfigured(BusinessId),

    /// The slot is not part of the day's generated inventory.
    #[error("Slot {slot_id} is not in the day's inventory")]
    UnknownSlot {
        /// The rejected slot.
        slot_id: SlotId,
    },

    /// The slot is already taken on that date.
    #[error("Slot {slot_id} on {date} is already booked")]
    SlotTaken {
        /// The contested slot.
        slot_id: SlotId,
        /// The service date.
        date: NaiveDate,
    },

    /// The staff member does not belong to the business.
    #[error("Staff {staff_id} is not linked to business {business_id}")]
    StaffNotLinked {
        /// The staff member.
        staff_id: StaffId,
        /// The business.
        business_id: BusinessId,
    },

    /// The caller is not the staff member assigned to the booking.
    #[error("Staff {staff_id} is not assigned to booking {booking_id}")]
    NotAssignedStaff {
        /// The calling staff member.
        staff_id: StaffId,
        /// The booking.
        booking_id: BookingId,
    },

    /// The booking has no assigned staff member to pay.
    #[error("Booking {0} has no assigned staff to pay")]
    NoAssignedStaff(BookingId),

    /// The caller does not own the booking.
    #[error("Customer is not the owner of booking {booking_id}")]
    NotBookingOwner {
        /// The booking.
        booking_id: BookingId,
    },

    /// Unlink processing for this staff member is halted.
    ///
    /// Set after a failed commit compensation; cleared only by manual
    /// reconciliation.
    #[error("Unlink for staff {staff_id} is halted pending manual reconciliation")]
    UnlinkHalted {
        /// The staff member.
        staff_id: StaffId,
    },

    /// Storage adapter failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Payment gateway failure.
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

impl EngineError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Schedule(e) => e.status_code(),
            Self::Booking(e) => e.status_code(),
            Self::Staffing(e) => e.status_code(),
            Self::Reassignment(e) => e.status_code(),
            Self::Payout(e) => e.status_code(),
            Self::BookingNotFound(_)
            | Self::PaymentRequestNotFound(_)
            | Self::WindowNotConfigured(_) => 404,
            Self::UnknownSlot { .. } | Self::NoAssignedStaff(_) => 422,
            Self::PaymentRequestExists(_) | Self::SlotTaken { .. } | Self::UnlinkHalted { .. } => {
                409
            }
            Self::StaffNotLinked { .. }
            | Self::NotAssignedStaff { .. }
            | Self::NotBookingOwner { .. } => 403,
            Self::Storage(_) | Self::Gateway(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Schedule(e) => e.error_code(),
            Self::Booking(e) => e.error_code(),
            Self::Staffing(e) => e.error_code(),
            Self::Reassignment(e) => e.error_code(),
            Self::Payout(e) => e.error_code(),
            Self::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            Self::PaymentRequestNotFound(_) => "PAYMENT_REQUEST_NOT_FOUND",
            Self::PaymentRequestExists(_) => "PAYMENT_REQUEST_EXISTS",
            Self::WindowNotConfigured(_) => "WINDOW_NOT_CONFIGURED",
            Self::UnknownSlot { .. } => "UNKNOWN_SLOT",
            Self::SlotTaken { .. } => "SLOT_TAKEN",
            Self::StaffNotLinked { .. } => "STAFF_NOT_LINKED",
            Self::NotAssignedStaff { .. } => "NOT_ASSIGNED_STAFF",
            Self::NoAssignedStaff(_) => "NO_ASSIGNED_STAFF",
            Self::NotBookingOwner { .. } => "NOT_BOOKING_OWNER",
            Self::UnlinkHalted { .. } => "UNLINK_HALTED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
        }
    }
}

impl From<crate::store::StoreError> for EngineError {
    fn from(err: crate::store::StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<crate::store::PaymentGatewayError> for EngineError {
    fn from(err: crate::store::PaymentGatewayError) -> Self {
        Self::Gateway(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixora_core::booking::{BookingError, TrackingStatus};

    #[test]
    fn test_domain_codes_pass_through() {
        let err = EngineError::from(BookingError::CannotCancel {
            tracking: TrackingStatus::ServiceStarted,
        });
        assert_eq!(err.error_code(), "CANNOT_CANCEL");
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_engine_level_codes() {
        let err = EngineError::BookingNotFound(BookingId::new());
        assert_eq!(err.error_code(), "BOOKING_NOT_FOUND");
        assert_eq!(err.status_code(), 404);

        let err = EngineError::UnlinkHalted {
            staff_id: StaffId::new(),
        };
        assert_eq!(err.error_code(), "UNLINK_HALTED");
        assert_eq!(err.status_code(), 409);
    }
}
