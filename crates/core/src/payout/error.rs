//! Payout error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::booking::types::{BookingStatus, PaymentStatus};
use crate::payout::types::PaymentRequestStatus;

/// Errors that can occur during payout operations.
#[derive(Debug, Error)]
pub enum PayoutError {
    /// Payout computed on a booking that is not completed and paid.
    #[error("Booking is not eligible for payout (status {booking}, payment {payment})")]
    NotEligible {
        /// The booking status found.
        booking: BookingStatus,
        /// The payment status found.
        payment: PaymentStatus,
    },

    /// Percentage must lie in (0, 100].
    #[error("Staff percentage {percentage} must be greater than 0 and at most 100")]
    InvalidPercentage {
        /// The rejected percentage.
        percentage: Decimal,
    },

    /// Amounts cannot be negative.
    #[error("Requested amount {amount} must not be negative")]
    NegativeAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// Attempted a request transition not in the allowed table.
    #[error("Payment request cannot move from {from} to {to}")]
    InvalidRequestTransition {
        /// The current request status.
        from: PaymentRequestStatus,
        /// The attempted target.
        to: PaymentRequestStatus,
    },

    /// A rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,
}

impl PayoutError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotEligible { .. } => 422,
            Self::InvalidPercentage { .. }
            | Self::NegativeAmount { .. }
            | Self::InvalidRequestTransition { .. }
            | Self::RejectionReasonRequired => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotEligible { .. } => "NOT_ELIGIBLE",
            Self::InvalidPercentage { .. } => "INVALID_PERCENTAGE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::InvalidRequestTransition { .. } => "INVALID_REQUEST_TRANSITION",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
        }
    }
}
