//! Property-based tests for BookingService.

use proptest::prelude::*;

use fixora_shared::types::{CustomerId, StaffId};

use crate::booking::error::BookingError;
use crate::booking::service::BookingService;
use crate::booking::types::{BookingState, BookingStatus, PaymentStatus, TrackingStatus};

fn arb_booking_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Pending),
        Just(BookingStatus::PendingPayment),
        Just(BookingStatus::Confirmed),
        Just(BookingStatus::CancelRequested),
        Just(BookingStatus::Cancelled),
        Just(BookingStatus::Completed),
    ]
}

fn arb_payment_status() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Pending),
        Just(PaymentStatus::Paid),
        Just(PaymentStatus::Failed),
        Just(PaymentStatus::Cancelled),
    ]
}

fn arb_tracking_status() -> impl Strategy<Value = TrackingStatus> {
    prop_oneof![
        Just(TrackingStatus::NotStarted),
        Just(TrackingStatus::BookingStarted),
        Just(TrackingStatus::ProviderOnTheWay),
        Just(TrackingStatus::ServiceStarted),
        Just(TrackingStatus::Completed),
    ]
}

/// Any combination of the three statuses, valid or not.
fn arb_state() -> impl Strategy<Value = BookingState> {
    (arb_booking_status(), arb_payment_status(), arb_tracking_status()).prop_map(
        |(booking, payment, tracking)| BookingState {
            booking,
            payment,
            tracking,
        },
    )
}

/// Only combinations reachable through the state machine.
fn arb_valid_state() -> impl Strategy<Value = BookingState> {
    arb_state().prop_filter("valid combination", BookingState::is_valid)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Closure: every accepted transition lands on a valid combination.
    /// The state machine can never manufacture an invalid triple.
    #[test]
    fn prop_transitions_preserve_validity(state in arb_valid_state(), to in arb_tracking_status()) {
        let staff = StaffId::from_uuid(uuid::Uuid::nil());
        let customer = CustomerId::from_uuid(uuid::Uuid::nil());

        let results = [
            BookingService::confirm_payment(state),
            BookingService::fail_payment(state),
            BookingService::reissue_payment_link(state),
            BookingService::confirm(state),
            BookingService::advance_tracking(state, to, staff),
            BookingService::request_cancellation(state, customer),
            BookingService::finalize_cancellation(state),
            BookingService::cancel_by_business(state, "reason".to_string()),
        ];
        for result in results {
            if let Ok(transition) = result {
                prop_assert!(
                    transition.new_state().is_valid(),
                    "transition out of {} produced invalid {}",
                    state, transition.new_state()
                );
            }
        }
    }

    /// A booking can never reach Completed while payment is not Paid.
    #[test]
    fn prop_completion_requires_paid(state in arb_valid_state()) {
        let staff = StaffId::from_uuid(uuid::Uuid::nil());
        if let Ok(transition) =
            BookingService::advance_tracking(state, TrackingStatus::Completed, staff)
        {
            prop_assert_eq!(transition.new_state().payment, PaymentStatus::Paid);
        }
    }

    /// Once tracking has left NotStarted, cancellation is refused for
    /// every booking status.
    #[test]
    fn prop_no_cancellation_after_start(state in arb_valid_state()) {
        prop_assume!(state.tracking != TrackingStatus::NotStarted);
        let customer = CustomerId::from_uuid(uuid::Uuid::nil());
        prop_assert!(BookingService::request_cancellation(state, customer).is_err());
        prop_assert!(
            BookingService::cancel_by_business(state, "reason".to_string()).is_err()
        );
    }

    /// Terminal states admit no transition at all.
    #[test]
    fn prop_terminal_states_are_closed(state in arb_valid_state(), to in arb_tracking_status()) {
        prop_assume!(state.is_terminal());
        let staff = StaffId::from_uuid(uuid::Uuid::nil());
        let customer = CustomerId::from_uuid(uuid::Uuid::nil());

        prop_assert!(BookingService::confirm_payment(state).is_err());
        prop_assert!(BookingService::fail_payment(state).is_err());
        prop_assert!(BookingService::reissue_payment_link(state).is_err());
        prop_assert!(BookingService::confirm(state).is_err());
        prop_assert!(BookingService::advance_tracking(state, to, staff).is_err());
        prop_assert!(BookingService::request_cancellation(state, customer).is_err());
        prop_assert!(BookingService::finalize_cancellation(state).is_err());
        prop_assert!(BookingService::cancel_by_business(state, "r".to_string()).is_err());
    }

    /// Tracking accepts exactly the next step and rejects everything else.
    #[test]
    fn prop_tracking_strictly_ordered(
        payment in arb_payment_status(),
        from in arb_tracking_status(),
        to in arb_tracking_status()
    ) {
        let state = BookingState {
            booking: BookingStatus::Confirmed,
            payment,
            tracking: from,
        };
        prop_assume!(state.is_valid());

        let staff = StaffId::from_uuid(uuid::Uuid::nil());
        let result = BookingService::advance_tracking(state, to, staff);
        if from.next() == Some(to) {
            if to == TrackingStatus::Completed && payment != PaymentStatus::Paid {
                let matched = matches!(result, Err(BookingError::UnpaidCompletion { .. }));
                prop_assert!(matched);
            } else {
                prop_assert!(result.is_ok());
            }
        } else {
            let matched = matches!(result, Err(BookingError::TrackingOutOfOrder { .. }));
            prop_assert!(matched);
        }
    }
}
