//! Booking domain types for lifecycle management.
//!
//! A booking's observable state is the joint triple of booking, payment
//! and tracking status. Only the combinations in [`BookingState::is_valid`]
//! are reachable through the state machine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use fixora_shared::types::{BookingId, BusinessId, CustomerId, ServiceId, StaffId};

use crate::schedule::SlotId;

/// Booking status in the lifecycle.
///
/// Valid transitions:
/// - Pending | PendingPayment → Confirmed (payment success webhook)
/// - Pending → Confirmed (provider confirm, pay-on-site)
/// - Pending | PendingPayment | Confirmed → CancelRequested (customer, tracking not started)
/// - CancelRequested → Cancelled (provider/refund acknowledgement)
/// - Pending | PendingPayment | Confirmed → Cancelled (business-side cancel)
/// - Confirmed → Completed (tracking reaches completion, payment captured)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booking created; awaiting provider confirmation or payment.
    Pending,
    /// Booking created; checkout issued an out-of-band payment link.
    PendingPayment,
    /// Booking confirmed; service may be tracked.
    Confirmed,
    /// Customer asked to cancel; awaiting provider/refund acknowledgement.
    CancelRequested,
    /// Booking cancelled (terminal, retained for audit).
    Cancelled,
    /// Service delivered and paid (terminal).
    Completed,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PendingPayment => "pending_payment",
            Self::Confirmed => "confirmed",
            Self::CancelRequested => "cancel_requested",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "pending_payment" => Some(Self::PendingPayment),
            "confirmed" => Some(Self::Confirmed),
            "cancel_requested" => Some(Self::CancelRequested),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns true if no transition leads out of this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Returns true if the customer may still request cancellation
    /// (subject to tracking not having started).
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::PendingPayment | Self::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No capture yet.
    Pending,
    /// Payment captured.
    Paid,
    /// Last capture attempt failed; a fresh link must be issued.
    Failed,
    /// Payment cancelled or refunded.
    Cancelled,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-progress-service sub-state of a confirmed booking.
///
/// Advances strictly in order; no skipping, no reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// Service not yet begun.
    NotStarted,
    /// Staff acknowledged and started the booking.
    BookingStarted,
    /// Staff en route to the customer.
    ProviderOnTheWay,
    /// Service in progress on site.
    ServiceStarted,
    /// Service delivered.
    Completed,
}

impl TrackingStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::BookingStarted => "booking_started",
            Self::ProviderOnTheWay => "provider_on_the_way",
            Self::ServiceStarted => "service_started",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_started" => Some(Self::NotStarted),
            "booking_started" => Some(Self::BookingStarted),
            "provider_on_the_way" => Some(Self::ProviderOnTheWay),
            "service_started" => Some(Self::ServiceStarted),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns the next step in the progression, if any.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::BookingStarted),
            Self::BookingStarted => Some(Self::ProviderOnTheWay),
            Self::ProviderOnTheWay => Some(Self::ServiceStarted),
            Self::ServiceStarted => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns true if the service is actively underway.
    ///
    /// This is the set that makes an assigned staff member BUSY.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::BookingStarted | Self::ProviderOnTheWay | Self::ServiceStarted
        )
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The joint (booking, payment, tracking) status triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingState {
    /// Lifecycle status.
    pub booking: BookingStatus,
    /// Payment status.
    pub payment: PaymentStatus,
    /// Tracking status.
    pub tracking: TrackingStatus,
}

impl BookingState {
    /// Initial state at creation.
    ///
    /// `PendingPayment` when checkout issues an out-of-band payment link,
    /// plain `Pending` otherwise.
    #[must_use]
    pub fn initial(with_payment_link: bool) -> Self {
        Self {
            booking: if with_payment_link {
                BookingStatus::PendingPayment
            } else {
                BookingStatus::Pending
            },
            payment: PaymentStatus::Pending,
            tracking: TrackingStatus::NotStarted,
        }
    }

    /// Returns true if the triple is one of the valid combinations.
    ///
    /// An invalid combination is a programming error (or corrupted
    /// storage), never a recoverable runtime state.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        use BookingStatus as B;
        use PaymentStatus as P;
        use TrackingStatus as T;

        match self.booking {
            B::Pending => {
                matches!(self.payment, P::Pending | P::Failed) && self.tracking == T::NotStarted
            }
            B::PendingPayment => {
                matches!(self.payment, P::Pending | P::Failed) && self.tracking == T::NotStarted
            }
            B::Confirmed => {
                matches!(self.payment, P::Pending | P::Paid) && self.tracking != T::Completed
            }
            B::CancelRequested => {
                matches!(self.payment, P::Pending | P::Paid | P::Failed)
                    && self.tracking == T::NotStarted
            }
            B::Cancelled => self.tracking == T::NotStarted,
            B::Completed => self.payment == P::Paid && self.tracking == T::Completed,
        }
    }

    /// Returns true if no transition leads out of this state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.booking.is_terminal()
    }

    /// Returns true if the customer may cancel from this state.
    ///
    /// Single source of truth for cancellation eligibility; the state
    /// machine and the derived UI actions both consult it.
    #[must_use]
    pub fn can_request_cancellation(&self) -> bool {
        self.booking.is_cancellable() && self.tracking == TrackingStatus::NotStarted
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.booking, self.payment, self.tracking)
    }
}

/// A booking: a customer's reservation of a service slot on a date.
///
/// Never deleted; cancelled bookings are retained for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// The booked service offering.
    pub service_id: ServiceId,
    /// The booking customer.
    pub customer_id: CustomerId,
    /// The provider business.
    pub business_id: BusinessId,
    /// Service date.
    pub date: NaiveDate,
    /// The booked slot within the day.
    pub slot_id: SlotId,
    /// Joint lifecycle state.
    pub state: BookingState,
    /// Currently assigned staff member, if any.
    pub assigned_staff_id: Option<StaffId>,
    /// Total service price.
    pub total_amount: Decimal,
    /// Authoritative payment-link deadline, when a link was issued.
    pub payment_link_expires_at: Option<DateTime<Utc>>,
    /// Whether customer feedback has been recorded.
    pub feedback_recorded: bool,
    /// Optimistic-concurrency token; bumped on every committed mutation.
    pub version: u64,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

/// A state transition with audit data.
///
/// Each variant captures the action performed, the resulting state triple,
/// and who/when.
#[derive(Debug, Clone)]
pub enum BookingTransition {
    /// Payment captured via the webhook; booking confirmed.
    PaymentConfirmed {
        /// The resulting state.
        new_state: BookingState,
        /// When the capture was recorded.
        confirmed_at: DateTime<Utc>,
    },
    /// Payment attempt failed; booking unchanged, link must be reissued.
    PaymentFailed {
        /// The resulting state.
        new_state: BookingState,
        /// When the failure was recorded.
        failed_at: DateTime<Utc>,
    },
    /// A fresh payment link supersedes the previous one.
    PaymentLinkReissued {
        /// The resulting state.
        new_state: BookingState,
        /// When the link was reissued.
        reissued_at: DateTime<Utc>,
    },
    /// Provider confirmed a pending booking.
    Confirmed {
        /// The resulting state.
        new_state: BookingState,
        /// When the provider confirmed.
        confirmed_at: DateTime<Utc>,
    },
    /// Tracking advanced one step.
    TrackingAdvanced {
        /// The resulting state.
        new_state: BookingState,
        /// The staff member who advanced tracking.
        advanced_by: StaffId,
        /// When tracking advanced.
        advanced_at: DateTime<Utc>,
    },
    /// Customer requested cancellation.
    CancellationRequested {
        /// The resulting state.
        new_state: BookingState,
        /// The requesting customer.
        requested_by: CustomerId,
        /// When the request was made.
        requested_at: DateTime<Utc>,
    },
    /// Booking cancelled.
    Cancelled {
        /// The resulting state.
        new_state: BookingState,
        /// Business-side cancellation reason, if any.
        reason: Option<String>,
        /// When the booking was cancelled.
        cancelled_at: DateTime<Utc>,
    },
}

impl BookingTransition {
    /// Returns the state resulting from this transition.
    #[must_use]
    pub fn new_state(&self) -> BookingState {
        match self {
            Self::PaymentConfirmed { new_state, .. }
            | Self::PaymentFailed { new_state, .. }
            | Self::PaymentLinkReissued { new_state, .. }
            | Self::Confirmed { new_state, .. }
            | Self::TrackingAdvanced { new_state, .. }
            | Self::CancellationRequested { new_state, .. }
            | Self::Cancelled { new_state, .. } => *new_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::PendingPayment,
            BookingStatus::Confirmed,
            BookingStatus::CancelRequested,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("invalid"), None);
    }

    #[test]
    fn test_tracking_progression_order() {
        assert_eq!(
            TrackingStatus::NotStarted.next(),
            Some(TrackingStatus::BookingStarted)
        );
        assert_eq!(
            TrackingStatus::BookingStarted.next(),
            Some(TrackingStatus::ProviderOnTheWay)
        );
        assert_eq!(
            TrackingStatus::ProviderOnTheWay.next(),
            Some(TrackingStatus::ServiceStarted)
        );
        assert_eq!(
            TrackingStatus::ServiceStarted.next(),
            Some(TrackingStatus::Completed)
        );
        assert_eq!(TrackingStatus::Completed.next(), None);
    }

    #[test]
    fn test_in_progress_set() {
        assert!(!TrackingStatus::NotStarted.is_in_progress());
        assert!(TrackingStatus::BookingStarted.is_in_progress());
        assert!(TrackingStatus::ProviderOnTheWay.is_in_progress());
        assert!(TrackingStatus::ServiceStarted.is_in_progress());
        assert!(!TrackingStatus::Completed.is_in_progress());
    }

    #[test]
    fn test_initial_states() {
        let with_link = BookingState::initial(true);
        assert_eq!(with_link.booking, BookingStatus::PendingPayment);
        assert_eq!(with_link.payment, PaymentStatus::Pending);
        assert_eq!(with_link.tracking, TrackingStatus::NotStarted);
        assert!(with_link.is_valid());

        let without_link = BookingState::initial(false);
        assert_eq!(without_link.booking, BookingStatus::Pending);
        assert!(without_link.is_valid());
    }

    #[test]
    fn test_completed_requires_paid() {
        let unpaid_complete = BookingState {
            booking: BookingStatus::Completed,
            payment: PaymentStatus::Pending,
            tracking: TrackingStatus::Completed,
        };
        assert!(!unpaid_complete.is_valid());

        let paid_complete = BookingState {
            booking: BookingStatus::Completed,
            payment: PaymentStatus::Paid,
            tracking: TrackingStatus::Completed,
        };
        assert!(paid_complete.is_valid());
    }

    #[test]
    fn test_tracking_requires_confirmed() {
        let pending_started = BookingState {
            booking: BookingStatus::Pending,
            payment: PaymentStatus::Pending,
            tracking: TrackingStatus::ServiceStarted,
        };
        assert!(!pending_started.is_valid());
    }

    #[test]
    fn test_cancellation_window() {
        let confirmed = BookingState {
            booking: BookingStatus::Confirmed,
            payment: PaymentStatus::Paid,
            tracking: TrackingStatus::NotStarted,
        };
        assert!(confirmed.can_request_cancellation());

        let started = BookingState {
            booking: BookingStatus::Confirmed,
            payment: PaymentStatus::Paid,
            tracking: TrackingStatus::BookingStarted,
        };
        assert!(!started.can_request_cancellation());

        let completed = BookingState {
            booking: BookingStatus::Completed,
            payment: PaymentStatus::Paid,
            tracking: TrackingStatus::Completed,
        };
        assert!(!completed.can_request_cancellation());
    }

    #[test]
    fn test_state_display() {
        let state = BookingState::initial(true);
        assert_eq!(state.to_string(), "(pending_payment, pending, not_started)");
    }
}
