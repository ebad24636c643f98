//! Derived action eligibility for the dashboard collaborators.
//!
//! One table-driven derivation replaces the per-screen status checks the
//! dashboards would otherwise each reimplement (and disagree on).

use serde::{Deserialize, Serialize};

use crate::booking::types::{Booking, BookingStatus};

/// What the current viewer may do with a booking, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingActions {
    /// Customer may request cancellation.
    pub can_cancel: bool,
    /// Contact between customer and provider still makes sense.
    pub can_call: bool,
    /// Customer may leave feedback.
    pub can_give_feedback: bool,
}

impl BookingActions {
    /// Derives the action set for a booking.
    #[must_use]
    pub fn derive(booking: &Booking) -> Self {
        let state = booking.state;
        Self {
            can_cancel: state.can_request_cancellation(),
            can_call: !state.is_terminal(),
            can_give_feedback: state.booking == BookingStatus::Completed
                && !booking.feedback_recorded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use fixora_shared::types::{BookingId, BusinessId, CustomerId, ServiceId};

    use crate::booking::types::{BookingState, PaymentStatus, TrackingStatus};
    use crate::schedule::SlotId;

    fn booking(state: BookingState, feedback_recorded: bool) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            service_id: ServiceId::new(),
            customer_id: CustomerId::new(),
            business_id: BusinessId::new(),
            date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            slot_id: SlotId(9 * 60),
            state,
            assigned_staff_id: None,
            total_amount: Decimal::new(15000, 2),
            payment_link_expires_at: None,
            feedback_recorded,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn state(b: BookingStatus, p: PaymentStatus, t: TrackingStatus) -> BookingState {
        BookingState {
            booking: b,
            payment: p,
            tracking: t,
        }
    }

    #[test]
    fn test_fresh_booking_actions() {
        let actions = BookingActions::derive(&booking(BookingState::initial(true), false));
        assert!(actions.can_cancel);
        assert!(actions.can_call);
        assert!(!actions.can_give_feedback);
    }

    #[test]
    fn test_underway_booking_cannot_cancel() {
        let actions = BookingActions::derive(&booking(
            state(
                BookingStatus::Confirmed,
                PaymentStatus::Paid,
                TrackingStatus::ServiceStarted,
            ),
            false,
        ));
        assert!(!actions.can_cancel);
        assert!(actions.can_call);
    }

    #[test]
    fn test_completed_booking_feedback_once() {
        let completed = state(
            BookingStatus::Completed,
            PaymentStatus::Paid,
            TrackingStatus::Completed,
        );
        let first = BookingActions::derive(&booking(completed, false));
        assert!(first.can_give_feedback);
        assert!(!first.can_call);
        assert!(!first.can_cancel);

        let second = BookingActions::derive(&booking(completed, true));
        assert!(!second.can_give_feedback);
    }

    #[test]
    fn test_cancelled_booking_is_inert() {
        let actions = BookingActions::derive(&booking(
            state(
                BookingStatus::Cancelled,
                PaymentStatus::Cancelled,
                TrackingStatus::NotStarted,
            ),
            false,
        ));
        assert!(!actions.can_cancel);
        assert!(!actions.can_call);
        assert!(!actions.can_give_feedback);
    }
}
