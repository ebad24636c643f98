//! Booking error types for lifecycle management.

use chrono::{DateTime, Utc};
use thiserror::Error;

use fixora_shared::types::BookingId;

use crate::booking::types::{BookingState, PaymentStatus, TrackingStatus};

/// The operation whose transition was attempted.
///
/// Carried inside [`BookingError::InvalidTransition`] so the structured
/// error names what the caller tried to do, not just where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Payment success webhook.
    ConfirmPayment,
    /// Payment failure webhook.
    FailPayment,
    /// Fresh payment link issued.
    ReissuePaymentLink,
    /// Provider confirmation of a pending booking.
    Confirm,
    /// Staff tracking progression.
    AdvanceTracking,
    /// Staff assignment to the booking.
    AssignStaff,
    /// Customer cancellation request.
    RequestCancellation,
    /// Provider/refund acknowledgement of a cancellation request.
    FinalizeCancellation,
    /// Business-side direct cancellation.
    CancelByBusiness,
    /// Customer feedback submission.
    RecordFeedback,
}

impl TransitionKind {
    /// Returns the string representation of the operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfirmPayment => "confirm_payment",
            Self::FailPayment => "fail_payment",
            Self::ReissuePaymentLink => "reissue_payment_link",
            Self::Confirm => "confirm",
            Self::AdvanceTracking => "advance_tracking",
            Self::AssignStaff => "assign_staff",
            Self::RequestCancellation => "request_cancellation",
            Self::FinalizeCancellation => "finalize_cancellation",
            Self::CancelByBusiness => "cancel_by_business",
            Self::RecordFeedback => "record_feedback",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during booking lifecycle operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Attempted a transition not present in the allowed table.
    #[error("Cannot {action} from state {from}")]
    InvalidTransition {
        /// The current state triple.
        from: BookingState,
        /// The attempted operation.
        action: TransitionKind,
    },

    /// Tracking may only advance strictly in order.
    #[error("Tracking cannot move from {from} to {to}")]
    TrackingOutOfOrder {
        /// The current tracking status.
        from: TrackingStatus,
        /// The attempted target.
        to: TrackingStatus,
    },

    /// Completing the service requires payment to already be captured.
    #[error("Cannot complete service with payment status {payment}")]
    UnpaidCompletion {
        /// The offending payment status.
        payment: PaymentStatus,
    },

    /// Cancellation attempted past the allowed window.
    #[error("Cannot cancel: tracking already {tracking}")]
    CannotCancel {
        /// The current tracking status.
        tracking: TrackingStatus,
    },

    /// Lost a race on the same booking; the state already advanced.
    #[error("Booking {booking_id} was modified concurrently (expected version {expected_version})")]
    StaleTransition {
        /// The contested booking.
        booking_id: BookingId,
        /// The version the caller read.
        expected_version: u64,
    },

    /// Payment success received after the authoritative link expiry.
    #[error("Payment link for booking {booking_id} expired at {expired_at}")]
    PaymentLinkExpired {
        /// The booking whose link expired.
        booking_id: BookingId,
        /// The authoritative expiry instant.
        expired_at: DateTime<Utc>,
    },

    /// Feedback already recorded; re-submission is rejected, not overwritten.
    #[error("Feedback already recorded for booking {booking_id}")]
    FeedbackAlreadyRecorded {
        /// The booking in question.
        booking_id: BookingId,
    },

    /// A cancellation reason is required but not provided.
    #[error("Cancellation reason is required")]
    CancellationReasonRequired,

    /// The stored state triple is not a valid combination.
    ///
    /// This is a data-integrity violation, not a recoverable runtime
    /// state; it is surfaced so the caller can halt and reconcile.
    #[error("Booking {booking_id} holds invalid state {state}")]
    InvalidState {
        /// The corrupted booking.
        booking_id: BookingId,
        /// The invalid triple.
        state: BookingState,
    },
}

impl BookingError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::TrackingOutOfOrder { .. }
            | Self::CancellationReasonRequired => 400,
            Self::UnpaidCompletion { .. }
            | Self::CannotCancel { .. }
            | Self::PaymentLinkExpired { .. } => 422,
            Self::StaleTransition { .. } | Self::FeedbackAlreadyRecorded { .. } => 409,
            Self::InvalidState { .. } => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } | Self::TrackingOutOfOrder { .. } => {
                "INVALID_TRANSITION"
            }
            Self::UnpaidCompletion { .. } => "UNPAID_COMPLETION",
            Self::CannotCancel { .. } => "CANNOT_CANCEL",
            Self::StaleTransition { .. } => "STALE_TRANSITION",
            Self::PaymentLinkExpired { .. } => "PAYMENT_LINK_EXPIRED",
            Self::FeedbackAlreadyRecorded { .. } => "FEEDBACK_ALREADY_RECORDED",
            Self::CancellationReasonRequired => "CANCELLATION_REASON_REQUIRED",
            Self::InvalidState { .. } => "INVALID_STATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::types::BookingStatus;

    #[test]
    fn test_invalid_transition_error() {
        let err = BookingError::InvalidTransition {
            from: BookingState {
                booking: BookingStatus::Completed,
                payment: PaymentStatus::Paid,
                tracking: TrackingStatus::Completed,
            },
            action: TransitionKind::ConfirmPayment,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("confirm_payment"));
        assert!(err.to_string().contains("completed"));
    }

    #[test]
    fn test_stale_transition_error() {
        let err = BookingError::StaleTransition {
            booking_id: BookingId::new(),
            expected_version: 3,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "STALE_TRANSITION");
    }

    #[test]
    fn test_cannot_cancel_error() {
        let err = BookingError::CannotCancel {
            tracking: TrackingStatus::ServiceStarted,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "CANNOT_CANCEL");
        assert!(err.to_string().contains("service_started"));
    }

    #[test]
    fn test_unpaid_completion_error() {
        let err = BookingError::UnpaidCompletion {
            payment: PaymentStatus::Pending,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "UNPAID_COMPLETION");
    }
}
