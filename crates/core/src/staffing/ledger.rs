//! The staff availability ledger.
//!
//! BUSY/AVAILABLE is derived, never stored: a staff member is BUSY while
//! they hold at least one ACTIVE assignment on a booking whose tracking is
//! underway. The orchestration layer reports tracking movement through
//! [`StaffAvailabilityLedger::note_tracking`] and serializes access per
//! staff member; the ledger itself is a plain value and cheap to clone,
//! which is what the reassignment commit uses for its all-or-nothing
//! scratch copy.

use chrono::Utc;
use std::collections::{HashMap, HashSet};

use fixora_shared::types::{BookingId, StaffId};

use crate::booking::types::TrackingStatus;
use crate::staffing::error::StaffingError;
use crate::staffing::types::{AssignmentStatus, StaffAssignment};

/// Per-staff busy/available bookkeeping derived from active assignments.
#[derive(Debug, Clone, Default)]
pub struct StaffAvailabilityLedger {
    /// The single ACTIVE assignment per booking.
    active: HashMap<BookingId, StaffAssignment>,
    /// Superseded records (TRANSFERRED / REMOVED), retained for audit.
    history: Vec<StaffAssignment>,
    /// Bookings whose tracking is currently underway.
    in_progress: HashSet<BookingId>,
}

impl StaffAvailabilityLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a staff member to a booking.
    ///
    /// Fails with `StaffBusy` when the target is BUSY unless the caller
    /// overrides (the orchestration layer grants the override only for
    /// future-dated, not-yet-started bookings). Fails with
    /// `AlreadyAssigned` when the booking already has an active owner;
    /// reassignment goes through [`Self::transfer`].
    pub fn assign(
        &mut self,
        staff_id: StaffId,
        booking_id: BookingId,
        override_busy: bool,
    ) -> Result<&StaffAssignment, StaffingError> {
        if self.active.contains_key(&booking_id) {
            return Err(StaffingError::AlreadyAssigned { booking_id });
        }
        if !override_busy && self.is_busy(staff_id) {
            return Err(StaffingError::StaffBusy { staff_id });
        }

        let assignment = StaffAssignment {
            staff_id,
            booking_id,
            status: AssignmentStatus::Active,
            assigned_at: Utc::now(),
        };
        Ok(self.active.entry(booking_id).or_insert(assignment))
    }

    /// Releases a booking's active assignment, if any.
    ///
    /// Idempotent: releasing an already-released booking is a no-op.
    pub fn release(&mut self, booking_id: BookingId) -> Option<StaffAssignment> {
        let mut assignment = self.active.remove(&booking_id)?;
        self.in_progress.remove(&booking_id);
        assignment.status = AssignmentStatus::Removed;
        self.history.push(assignment.clone());
        Some(assignment)
    }

    /// Transfers a booking's active assignment to a replacement.
    ///
    /// The old record is retained as TRANSFERRED; the in-progress marker
    /// carries over, so a replacement taking over underway work is
    /// immediately BUSY.
    pub fn transfer(
        &mut self,
        booking_id: BookingId,
        to_staff: StaffId,
    ) -> Result<&StaffAssignment, StaffingError> {
        let mut old = self
            .active
            .remove(&booking_id)
            .ok_or(StaffingError::NoActiveAssignment { booking_id })?;
        old.status = AssignmentStatus::Transferred;
        self.history.push(old);

        let replacement = StaffAssignment {
            staff_id: to_staff,
            booking_id,
            status: AssignmentStatus::Active,
            assigned_at: Utc::now(),
        };
        Ok(self.active.entry(booking_id).or_insert(replacement))
    }

    /// Marks every remaining active assignment of a staff member REMOVED.
    ///
    /// Used by the unlink commit after all in-flight work has been
    /// transferred; returns how many records were cleared.
    pub fn remove_staff(&mut self, staff_id: StaffId) -> usize {
        let bookings: Vec<BookingId> = self
            .active
            .iter()
            .filter(|(_, a)| a.staff_id == staff_id)
            .map(|(id, _)| *id)
            .collect();
        for booking_id in &bookings {
            self.release(*booking_id);
        }
        bookings.len()
    }

    /// Records a booking's tracking movement.
    ///
    /// Underway tracking marks the booking in progress (its staff BUSY);
    /// completion or reset clears the marker.
    pub fn note_tracking(&mut self, booking_id: BookingId, tracking: TrackingStatus) {
        if tracking.is_in_progress() {
            self.in_progress.insert(booking_id);
        } else {
            self.in_progress.remove(&booking_id);
        }
    }

    /// Returns true if the staff member holds an in-progress assignment.
    #[must_use]
    pub fn is_busy(&self, staff_id: StaffId) -> bool {
        self.active
            .values()
            .any(|a| a.staff_id == staff_id && self.in_progress.contains(&a.booking_id))
    }

    /// Returns true if the staff member may take new work right now.
    #[must_use]
    pub fn is_available(&self, staff_id: StaffId) -> bool {
        !self.is_busy(staff_id)
    }

    /// The active assignment for a booking, if any.
    #[must_use]
    pub fn active_assignment(&self, booking_id: BookingId) -> Option<&StaffAssignment> {
        self.active.get(&booking_id)
    }

    /// All bookings a staff member actively owns.
    #[must_use]
    pub fn active_bookings_for(&self, staff_id: StaffId) -> Vec<BookingId> {
        self.active
            .values()
            .filter(|a| a.staff_id == staff_id)
            .map(|a| a.booking_id)
            .collect()
    }

    /// Superseded records, oldest first.
    #[must_use]
    pub fn history(&self) -> &[StaffAssignment] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_lookup() {
        let mut ledger = StaffAvailabilityLedger::new();
        let staff = StaffId::new();
        let booking = BookingId::new();

        let assignment = ledger.assign(staff, booking, false).unwrap();
        assert_eq!(assignment.status, AssignmentStatus::Active);
        assert_eq!(ledger.active_assignment(booking).unwrap().staff_id, staff);
    }

    #[test]
    fn test_double_assign_rejected() {
        let mut ledger = StaffAvailabilityLedger::new();
        let booking = BookingId::new();
        ledger.assign(StaffId::new(), booking, false).unwrap();

        let result = ledger.assign(StaffId::new(), booking, false);
        assert!(matches!(
            result,
            Err(StaffingError::AlreadyAssigned { .. })
        ));
    }

    #[test]
    fn test_busy_derivation() {
        let mut ledger = StaffAvailabilityLedger::new();
        let staff = StaffId::new();
        let booking = BookingId::new();
        ledger.assign(staff, booking, false).unwrap();

        // Assigned but not started: still available.
        assert!(ledger.is_available(staff));

        ledger.note_tracking(booking, TrackingStatus::ServiceStarted);
        assert!(!ledger.is_available(staff));

        // Completion frees the staff member again.
        ledger.note_tracking(booking, TrackingStatus::Completed);
        assert!(ledger.is_available(staff));
    }

    #[test]
    fn test_busy_staff_rejected_without_override() {
        let mut ledger = StaffAvailabilityLedger::new();
        let staff = StaffId::new();
        let underway = BookingId::new();
        ledger.assign(staff, underway, false).unwrap();
        ledger.note_tracking(underway, TrackingStatus::BookingStarted);

        let next = BookingId::new();
        let result = ledger.assign(staff, next, false);
        assert!(matches!(result, Err(StaffingError::StaffBusy { .. })));

        // Explicit override (future-dated booking) is allowed.
        assert!(ledger.assign(staff, next, true).is_ok());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut ledger = StaffAvailabilityLedger::new();
        let staff = StaffId::new();
        let booking = BookingId::new();
        ledger.assign(staff, booking, false).unwrap();

        assert!(ledger.release(booking).is_some());
        assert!(ledger.release(booking).is_none());
        assert!(ledger.active_assignment(booking).is_none());
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.history()[0].status, AssignmentStatus::Removed);
    }

    #[test]
    fn test_transfer_supersedes_and_carries_busy() {
        let mut ledger = StaffAvailabilityLedger::new();
        let old_staff = StaffId::new();
        let new_staff = StaffId::new();
        let booking = BookingId::new();
        ledger.assign(old_staff, booking, false).unwrap();
        ledger.note_tracking(booking, TrackingStatus::ServiceStarted);

        let replacement = ledger.transfer(booking, new_staff).unwrap();
        assert_eq!(replacement.staff_id, new_staff);
        assert_eq!(replacement.status, AssignmentStatus::Active);

        // Old staff freed, replacement busy with the underway work.
        assert!(ledger.is_available(old_staff));
        assert!(!ledger.is_available(new_staff));
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.history()[0].status, AssignmentStatus::Transferred);
    }

    #[test]
    fn test_transfer_without_assignment_fails() {
        let mut ledger = StaffAvailabilityLedger::new();
        let result = ledger.transfer(BookingId::new(), StaffId::new());
        assert!(matches!(
            result,
            Err(StaffingError::NoActiveAssignment { .. })
        ));
    }

    #[test]
    fn test_remove_staff_clears_active_records() {
        let mut ledger = StaffAvailabilityLedger::new();
        let staff = StaffId::new();
        let first = BookingId::new();
        let second = BookingId::new();
        ledger.assign(staff, first, false).unwrap();
        ledger.assign(staff, second, true).unwrap();

        assert_eq!(ledger.remove_staff(staff), 2);
        assert!(ledger.active_bookings_for(staff).is_empty());
        assert_eq!(ledger.history().len(), 2);
    }
}
