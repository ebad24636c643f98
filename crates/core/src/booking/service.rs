//! Booking state machine transitions.
//!
//! All legality is decided here, against the single transition table; the
//! orchestration layer persists the results. Every operation leaves its
//! input untouched and returns either a [`BookingTransition`] describing
//! the new state or a [`BookingError`].

use chrono::Utc;

use fixora_shared::types::{CustomerId, StaffId};

use crate::booking::error::{BookingError, TransitionKind};
use crate::booking::types::{
    Booking, BookingState, BookingStatus, BookingTransition, PaymentStatus, TrackingStatus,
};

/// Stateless service for booking lifecycle transitions.
pub struct BookingService;

impl BookingService {
    /// Record a payment-success webhook.
    ///
    /// `Pending`/`PendingPayment` with an uncaptured payment becomes
    /// `(Confirmed, Paid, NotStarted)`. Authoritative link-expiry
    /// enforcement happens in the orchestration layer, which knows the
    /// deadline; this transition only rules on state legality.
    pub fn confirm_payment(state: BookingState) -> Result<BookingTransition, BookingError> {
        match (state.booking, state.payment) {
            (
                BookingStatus::Pending | BookingStatus::PendingPayment,
                PaymentStatus::Pending,
            ) => Ok(BookingTransition::PaymentConfirmed {
                new_state: BookingState {
                    booking: BookingStatus::Confirmed,
                    payment: PaymentStatus::Paid,
                    tracking: state.tracking,
                },
                confirmed_at: Utc::now(),
            }),
            _ => Err(BookingError::InvalidTransition {
                from: state,
                action: TransitionKind::ConfirmPayment,
            }),
        }
    }

    /// Record a payment-failure webhook.
    ///
    /// The booking stays where it is; only the payment status moves to
    /// `Failed`. A fresh link must be issued out-of-band.
    pub fn fail_payment(state: BookingState) -> Result<BookingTransition, BookingError> {
        match (state.booking, state.payment) {
            (
                BookingStatus::Pending | BookingStatus::PendingPayment,
                PaymentStatus::Pending,
            ) => Ok(BookingTransition::PaymentFailed {
                new_state: BookingState {
                    payment: PaymentStatus::Failed,
                    ..state
                },
                failed_at: Utc::now(),
            }),
            _ => Err(BookingError::InvalidTransition {
                from: state,
                action: TransitionKind::FailPayment,
            }),
        }
    }

    /// Supersede an expired or failed payment link with a fresh one.
    ///
    /// Link expiry is terminal for the link, never for the booking: the
    /// booking stays `PendingPayment` and the payment returns to
    /// `Pending` awaiting the new link's outcome.
    pub fn reissue_payment_link(state: BookingState) -> Result<BookingTransition, BookingError> {
        match (state.booking, state.payment) {
            (
                BookingStatus::Pending | BookingStatus::PendingPayment,
                PaymentStatus::Pending | PaymentStatus::Failed,
            ) => {
                Ok(BookingTransition::PaymentLinkReissued {
                    new_state: BookingState {
                        payment: PaymentStatus::Pending,
                        ..state
                    },
                    reissued_at: Utc::now(),
                })
            }
            _ => Err(BookingError::InvalidTransition {
                from: state,
                action: TransitionKind::ReissuePaymentLink,
            }),
        }
    }

    /// Provider confirmation of a pending (pay-on-site) booking.
    ///
    /// Payment stays uncaptured; completion remains gated on capture. A
    /// booking whose payment attempt failed must recover through a fresh
    /// link before it can be confirmed.
    pub fn confirm(state: BookingState) -> Result<BookingTransition, BookingError> {
        match (state.booking, state.payment) {
            (BookingStatus::Pending, PaymentStatus::Pending) => Ok(BookingTransition::Confirmed {
                new_state: BookingState {
                    booking: BookingStatus::Confirmed,
                    ..state
                },
                confirmed_at: Utc::now(),
            }),
            _ => Err(BookingError::InvalidTransition {
                from: state,
                action: TransitionKind::Confirm,
            }),
        }
    }

    /// Advance tracking one step.
    ///
    /// Permitted only while the booking is `Confirmed`, strictly in
    /// order. Advancing to `Completed` requires payment `Paid` and drives
    /// the booking status to `Completed` (terminal).
    pub fn advance_tracking(
        state: BookingState,
        to: TrackingStatus,
        advanced_by: StaffId,
    ) -> Result<BookingTransition, BookingError> {
        if state.booking != BookingStatus::Confirmed {
            return Err(BookingError::InvalidTransition {
                from: state,
                action: TransitionKind::AdvanceTracking,
            });
        }
        if state.tracking.next() != Some(to) {
            return Err(BookingError::TrackingOutOfOrder {
                from: state.tracking,
                to,
            });
        }
        if to == TrackingStatus::Completed && state.payment != PaymentStatus::Paid {
            return Err(BookingError::UnpaidCompletion {
                payment: state.payment,
            });
        }

        let booking = if to == TrackingStatus::Completed {
            BookingStatus::Completed
        } else {
            BookingStatus::Confirmed
        };
        Ok(BookingTransition::TrackingAdvanced {
            new_state: BookingState {
                booking,
                payment: state.payment,
                tracking: to,
            },
            advanced_by,
            advanced_at: Utc::now(),
        })
    }

    /// Customer cancellation request.
    ///
    /// Permitted only inside the cancellation window: booking still
    /// cancellable and tracking not yet started.
    pub fn request_cancellation(
        state: BookingState,
        requested_by: CustomerId,
    ) -> Result<BookingTransition, BookingError> {
        Self::check_cancellable(state, TransitionKind::RequestCancellation)?;
        Ok(BookingTransition::CancellationRequested {
            new_state: BookingState {
                booking: BookingStatus::CancelRequested,
                ..state
            },
            requested_by,
            requested_at: Utc::now(),
        })
    }

    /// Provider/refund acknowledgement of a cancellation request.
    ///
    /// Captured payments move to `Cancelled` (refund); uncaptured ones
    /// are closed out; a failed payment stays `Failed` for audit.
    pub fn finalize_cancellation(state: BookingState) -> Result<BookingTransition, BookingError> {
        match state.booking {
            BookingStatus::CancelRequested => Ok(BookingTransition::Cancelled {
                new_state: BookingState {
                    booking: BookingStatus::Cancelled,
                    payment: Self::close_out_payment(state.payment),
                    tracking: state.tracking,
                },
                reason: None,
                cancelled_at: Utc::now(),
            }),
            _ => Err(BookingError::InvalidTransition {
                from: state,
                action: TransitionKind::FinalizeCancellation,
            }),
        }
    }

    /// Business-side direct cancellation.
    ///
    /// Funnels through the same cancellation window as the customer path
    /// but lands on `Cancelled` in one step; a non-empty reason is
    /// required.
    pub fn cancel_by_business(
        state: BookingState,
        reason: String,
    ) -> Result<BookingTransition, BookingError> {
        if reason.trim().is_empty() {
            return Err(BookingError::CancellationReasonRequired);
        }
        Self::check_cancellable(state, TransitionKind::CancelByBusiness)?;
        Ok(BookingTransition::Cancelled {
            new_state: BookingState {
                booking: BookingStatus::Cancelled,
                payment: Self::close_out_payment(state.payment),
                tracking: state.tracking,
            },
            reason: Some(reason),
            cancelled_at: Utc::now(),
        })
    }

    /// Validate a feedback submission.
    ///
    /// Feedback is only accepted for completed bookings and only once;
    /// re-submission is rejected, never overwritten.
    pub fn record_feedback(booking: &Booking) -> Result<(), BookingError> {
        if booking.state.booking != BookingStatus::Completed {
            return Err(BookingError::InvalidTransition {
                from: booking.state,
                action: TransitionKind::RecordFeedback,
            });
        }
        if booking.feedback_recorded {
            return Err(BookingError::FeedbackAlreadyRecorded {
                booking_id: booking.id,
            });
        }
        Ok(())
    }

    fn check_cancellable(state: BookingState, action: TransitionKind) -> Result<(), BookingError> {
        if state.can_request_cancellation() {
            return Ok(());
        }
        // Distinguish "tracking already underway" from "status not
        // cancellable at all" so the customer gets actionable text.
        if state.booking.is_cancellable() {
            Err(BookingError::CannotCancel {
                tracking: state.tracking,
            })
        } else {
            Err(BookingError::InvalidTransition { from: state, action })
        }
    }

    fn close_out_payment(payment: PaymentStatus) -> PaymentStatus {
        match payment {
            PaymentStatus::Pending | PaymentStatus::Paid | PaymentStatus::Cancelled => {
                PaymentStatus::Cancelled
            }
            PaymentStatus::Failed => PaymentStatus::Failed,
        }
    }
}
