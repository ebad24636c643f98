//! Property-based tests for StaffAvailabilityLedger.

use proptest::prelude::*;
use uuid::Uuid;

use fixora_shared::types::{BookingId, StaffId};

use crate::booking::types::TrackingStatus;
use crate::staffing::ledger::StaffAvailabilityLedger;
use crate::staffing::types::AssignmentStatus;

/// Random ledger operations over a small pool of staff and bookings.
#[derive(Debug, Clone)]
enum Op {
    Assign { staff: usize, booking: usize, override_busy: bool },
    Release { booking: usize },
    Transfer { booking: usize, to_staff: usize },
    Note { booking: usize, tracking: TrackingStatus },
}

fn arb_tracking() -> impl Strategy<Value = TrackingStatus> {
    prop_oneof![
        Just(TrackingStatus::NotStarted),
        Just(TrackingStatus::BookingStarted),
        Just(TrackingStatus::ProviderOnTheWay),
        Just(TrackingStatus::ServiceStarted),
        Just(TrackingStatus::Completed),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0usize..6, any::<bool>()).prop_map(|(staff, booking, override_busy)| {
            Op::Assign { staff, booking, override_busy }
        }),
        (0usize..6).prop_map(|booking| Op::Release { booking }),
        (0usize..6, 0usize..4).prop_map(|(booking, to_staff)| Op::Transfer { booking, to_staff }),
        (0usize..6, arb_tracking()).prop_map(|(booking, tracking)| Op::Note { booking, tracking }),
    ]
}

fn staff_pool() -> Vec<StaffId> {
    (0u128..4)
        .map(|n| StaffId::from_uuid(Uuid::from_u128(n + 1)))
        .collect()
}

fn booking_pool() -> Vec<BookingId> {
    (0u128..6)
        .map(|n| BookingId::from_uuid(Uuid::from_u128(n + 100)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever the operation sequence, BUSY always agrees with its
    /// definition: at least one ACTIVE assignment on an underway booking.
    /// Verified against an independent model of the in-progress set.
    #[test]
    fn prop_busy_matches_definition(ops in proptest::collection::vec(arb_op(), 1..40)) {
        let staff = staff_pool();
        let bookings = booking_pool();
        let mut ledger = StaffAvailabilityLedger::new();
        let mut model_in_progress: std::collections::HashSet<usize> =
            std::collections::HashSet::new();

        for op in ops {
            match op {
                Op::Assign { staff: s, booking: b, override_busy } => {
                    let _ = ledger.assign(staff[s], bookings[b], override_busy);
                }
                Op::Release { booking: b } => {
                    if ledger.release(bookings[b]).is_some() {
                        model_in_progress.remove(&b);
                    }
                }
                Op::Transfer { booking: b, to_staff: s } => {
                    let _ = ledger.transfer(bookings[b], staff[s]);
                }
                Op::Note { booking: b, tracking } => {
                    ledger.note_tracking(bookings[b], tracking);
                    if tracking.is_in_progress() {
                        model_in_progress.insert(b);
                    } else {
                        model_in_progress.remove(&b);
                    }
                }
            }

            for (si, member) in staff.iter().enumerate() {
                let expected_busy = bookings.iter().enumerate().any(|(bi, b)| {
                    model_in_progress.contains(&bi)
                        && ledger
                            .active_assignment(*b)
                            .is_some_and(|a| a.staff_id == *member)
                });
                prop_assert_eq!(
                    !ledger.is_available(*member),
                    expected_busy,
                    "staff {} busy mismatch", si
                );
            }
        }

        // History only ever holds superseded records.
        for record in ledger.history() {
            prop_assert_ne!(record.status, AssignmentStatus::Active);
        }
    }

    /// Release is idempotent: a second release of the same booking is a
    /// no-op and adds nothing to history.
    #[test]
    fn prop_release_idempotent(seed in 0u128..1000) {
        let staff = StaffId::from_uuid(Uuid::from_u128(seed + 1));
        let booking = BookingId::from_uuid(Uuid::from_u128(seed + 2));
        let mut ledger = StaffAvailabilityLedger::new();
        ledger.assign(staff, booking, false).unwrap();

        prop_assert!(ledger.release(booking).is_some());
        let after_first = ledger.history().len();
        prop_assert!(ledger.release(booking).is_none());
        prop_assert_eq!(ledger.history().len(), after_first);
    }
}
