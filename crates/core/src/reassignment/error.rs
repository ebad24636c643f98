//! Reassignment error types.

use thiserror::Error;

use fixora_shared::types::{BookingId, StaffId};

use crate::reassignment::types::UnlinkPhase;

/// Errors that can occur during the staff-unlink workflow.
#[derive(Debug, Error)]
pub enum ReassignmentError {
    /// Operation attempted in the wrong workflow phase.
    #[error("Unlink workflow is in phase {phase}, expected {expected}")]
    InvalidPhase {
        /// The current phase.
        phase: UnlinkPhase,
        /// The phase the operation requires.
        expected: UnlinkPhase,
    },

    /// The booking is not part of the in-flight set under transfer.
    #[error("Booking {booking_id} is not part of this unlink workflow")]
    UnknownBooking {
        /// The unknown booking.
        booking_id: BookingId,
    },

    /// A replacement cannot be the staff member being removed.
    #[error("Staff {staff_id} cannot be their own replacement")]
    SelfTransfer {
        /// The offending staff member.
        staff_id: StaffId,
    },

    /// The selected replacement is not in the available pool.
    #[error("Staff {staff_id} is not an available replacement for this business")]
    ReplacementNotAvailable {
        /// The rejected replacement.
        staff_id: StaffId,
    },

    /// Commit attempted while in-flight bookings lack replacements.
    #[error("{} booking(s) still need a replacement before the unlink can proceed", missing.len())]
    IncompleteTransfer {
        /// Bookings without a replacement selection.
        missing: Vec<BookingId>,
    },

    /// The atomic commit failed part-way and was rolled back.
    #[error("Transfer of booking {booking_id} failed, unlink rolled back: {reason}")]
    TransferCommit {
        /// The booking whose transfer failed.
        booking_id: BookingId,
        /// Backend failure description.
        reason: String,
    },

    /// Partially transferred ledger state detected after commit.
    ///
    /// Fatal: further automated unlink processing for this staff member
    /// must halt until manually reconciled.
    #[error("Partially transferred state detected for staff {staff_id}; manual reconciliation required")]
    PartialCommitDetected {
        /// The staff member whose unlink is corrupted.
        staff_id: StaffId,
    },
}

impl ReassignmentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::SelfTransfer { .. } => 400,
            Self::InvalidPhase { .. } => 409,
            Self::UnknownBooking { .. } => 404,
            Self::ReplacementNotAvailable { .. } | Self::IncompleteTransfer { .. } => 422,
            Self::TransferCommit { .. } | Self::PartialCommitDetected { .. } => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPhase { .. } => "INVALID_PHASE",
            Self::UnknownBooking { .. } => "UNKNOWN_BOOKING",
            Self::SelfTransfer { .. } => "SELF_TRANSFER",
            Self::ReplacementNotAvailable { .. } => "REPLACEMENT_NOT_AVAILABLE",
            Self::IncompleteTransfer { .. } => "INCOMPLETE_TRANSFER",
            Self::TransferCommit { .. } => "TRANSFER_COMMIT_FAILED",
            Self::PartialCommitDetected { .. } => "PARTIAL_COMMIT_DETECTED",
        }
    }

    /// Returns true if the error must halt automated processing.
    ///
    /// Everything else is recoverable by the caller after correcting
    /// input; only a detected partial commit is unsafe to retry.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::PartialCommitDetected { .. })
    }
}
