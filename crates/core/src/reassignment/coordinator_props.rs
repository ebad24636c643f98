//! Property-based tests for ReassignmentCoordinator.

use proptest::prelude::*;
use uuid::Uuid;

use fixora_shared::types::{BookingId, BusinessId, StaffId};

use crate::booking::types::TrackingStatus;
use crate::reassignment::coordinator::ReassignmentCoordinator;
use crate::reassignment::error::ReassignmentError;
use crate::reassignment::types::{InFlightBooking, UnlinkPhase};
use crate::staffing::ledger::StaffAvailabilityLedger;

fn staff(n: u128) -> StaffId {
    StaffId::from_uuid(Uuid::from_u128(n + 1))
}

fn booking(n: u128) -> BookingId {
    BookingId::from_uuid(Uuid::from_u128(n + 1000))
}

/// Builds a target with `count` in-flight bookings on a fresh ledger.
fn setup(count: usize) -> (StaffId, Vec<BookingId>, StaffAvailabilityLedger, ReassignmentCoordinator) {
    let target = staff(0);
    let bookings: Vec<BookingId> = (0..count as u128).map(booking).collect();
    let mut ledger = StaffAvailabilityLedger::new();
    let mut flights = Vec::new();
    for b in &bookings {
        ledger.assign(target, *b, true).unwrap();
        ledger.note_tracking(*b, TrackingStatus::BookingStarted);
        flights.push(InFlightBooking {
            booking_id: *b,
            tracking: TrackingStatus::BookingStarted,
        });
    }
    let pool: Vec<StaffId> = (1u128..4).map(staff).collect();
    let coordinator = ReassignmentCoordinator::begin(BusinessId::new(), target, flights, pool);
    (target, bookings, ledger, coordinator)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// All-or-nothing: confirm with any strict subset covered returns
    /// IncompleteTransfer naming exactly the uncovered bookings, and the
    /// ledger still shows every original assignment ACTIVE.
    #[test]
    fn prop_partial_coverage_never_commits(
        count in 1usize..6,
        covered_mask in proptest::collection::vec(any::<bool>(), 6),
        replacement_pick in 1u128..4,
    ) {
        let (target, bookings, mut ledger, mut coordinator) = setup(count);
        let replacement = staff(replacement_pick);

        let mut covered = 0;
        for (i, b) in bookings.iter().enumerate() {
            if covered_mask[i] {
                coordinator.select_replacement(*b, replacement).unwrap();
                covered += 1;
            }
        }
        prop_assume!(covered < count);

        match coordinator.confirm() {
            Err(ReassignmentError::IncompleteTransfer { missing }) => {
                prop_assert_eq!(missing.len(), count - covered);
            }
            other => prop_assert!(false, "expected IncompleteTransfer, got {:?}", other.map(|_| ())),
        }

        prop_assert_eq!(coordinator.phase(), UnlinkPhase::Transfer);
        for b in &bookings {
            let assignment = ledger.active_assignment(*b);
            prop_assert!(assignment.is_some_and(|a| a.staff_id == target));
        }
        // Commit out of phase is refused too.
        prop_assert!(coordinator.commit(&mut ledger).is_err());
    }

    /// Full coverage commits atomically: every in-flight booking ends up
    /// owned by its replacement and the target holds nothing.
    #[test]
    fn prop_full_coverage_commits_atomically(
        count in 0usize..6,
        picks in proptest::collection::vec(1u128..4, 6),
    ) {
        let (target, bookings, mut ledger, mut coordinator) = setup(count);

        for (i, b) in bookings.iter().enumerate() {
            coordinator.select_replacement(*b, staff(picks[i])).unwrap();
        }
        let plan = coordinator.confirm().unwrap();
        prop_assert_eq!(plan.len(), count);

        let summaries = coordinator.commit(&mut ledger).unwrap();
        prop_assert_eq!(summaries.len(), count);
        prop_assert_eq!(coordinator.phase(), UnlinkPhase::Committed);

        for (i, b) in bookings.iter().enumerate() {
            let assignment = ledger.active_assignment(*b);
            prop_assert!(assignment.is_some_and(|a| a.staff_id == staff(picks[i])));
        }
        prop_assert!(ledger.active_bookings_for(target).is_empty());
    }
}
