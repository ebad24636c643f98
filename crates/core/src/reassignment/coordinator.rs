//! The staff-unlink workflow state machine.

use std::collections::HashMap;

use fixora_shared::types::{BookingId, BusinessId, StaffId};

use crate::reassignment::error::ReassignmentError;
use crate::reassignment::types::{InFlightBooking, TransferSummary, UnlinkPhase};
use crate::staffing::ledger::StaffAvailabilityLedger;

/// Coordinates unlinking a staff member from a business.
///
/// Built from the CHECK query results: the target's in-flight bookings
/// and the pool of available same-business replacements. Collects one
/// replacement per booking (or one for all), refuses to confirm until
/// coverage is complete, and commits all-or-nothing against the ledger.
#[derive(Debug, Clone)]
pub struct ReassignmentCoordinator {
    business_id: BusinessId,
    target: StaffId,
    in_flight: Vec<InFlightBooking>,
    pool: Vec<StaffId>,
    replacements: HashMap<BookingId, StaffId>,
    phase: UnlinkPhase,
}

impl ReassignmentCoordinator {
    /// Starts the workflow from the CHECK results.
    ///
    /// With no in-flight bookings the workflow is immediately safe to
    /// confirm; otherwise it enters the TRANSFER phase. The target is
    /// never a valid member of the replacement pool.
    #[must_use]
    pub fn begin(
        business_id: BusinessId,
        target: StaffId,
        in_flight: Vec<InFlightBooking>,
        mut replacement_pool: Vec<StaffId>,
    ) -> Self {
        replacement_pool.retain(|s| *s != target);
        let phase = if in_flight.is_empty() {
            UnlinkPhase::Confirm
        } else {
            UnlinkPhase::Transfer
        };
        Self {
            business_id,
            target,
            in_flight,
            pool: replacement_pool,
            replacements: HashMap::new(),
            phase,
        }
    }

    /// The business the target is being unlinked from.
    #[must_use]
    pub fn business_id(&self) -> BusinessId {
        self.business_id
    }

    /// The staff member being unlinked.
    #[must_use]
    pub fn target(&self) -> StaffId {
        self.target
    }

    /// Current workflow phase.
    #[must_use]
    pub fn phase(&self) -> UnlinkPhase {
        self.phase
    }

    /// The in-flight bookings discovered by CHECK.
    #[must_use]
    pub fn in_flight(&self) -> &[InFlightBooking] {
        &self.in_flight
    }

    /// Bookings still lacking a replacement selection.
    #[must_use]
    pub fn missing_replacements(&self) -> Vec<BookingId> {
        self.in_flight
            .iter()
            .map(|b| b.booking_id)
            .filter(|id| !self.replacements.contains_key(id))
            .collect()
    }

    /// Selects a replacement for one in-flight booking.
    pub fn select_replacement(
        &mut self,
        booking_id: BookingId,
        replacement: StaffId,
    ) -> Result<(), ReassignmentError> {
        self.check_phase(UnlinkPhase::Transfer)?;
        if !self.in_flight.iter().any(|b| b.booking_id == booking_id) {
            return Err(ReassignmentError::UnknownBooking { booking_id });
        }
        self.check_replacement(replacement)?;
        self.replacements.insert(booking_id, replacement);
        Ok(())
    }

    /// Applies one replacement to every in-flight booking.
    pub fn apply_to_all(&mut self, replacement: StaffId) -> Result<(), ReassignmentError> {
        self.check_phase(UnlinkPhase::Transfer)?;
        self.check_replacement(replacement)?;
        for booking in &self.in_flight {
            self.replacements.insert(booking.booking_id, replacement);
        }
        Ok(())
    }

    /// Advances to CONFIRM, returning the final booking-to-staff mapping.
    ///
    /// Refuses while any in-flight booking lacks a replacement: partial
    /// commits are forbidden. Nothing is mutated yet; re-reading the plan
    /// from the CONFIRM phase is allowed.
    pub fn confirm(&mut self) -> Result<Vec<TransferSummary>, ReassignmentError> {
        match self.phase {
            UnlinkPhase::Transfer => {
                let missing = self.missing_replacements();
                if !missing.is_empty() {
                    return Err(ReassignmentError::IncompleteTransfer { missing });
                }
                self.phase = UnlinkPhase::Confirm;
                Ok(self.plan())
            }
            UnlinkPhase::Confirm => Ok(self.plan()),
            phase => Err(ReassignmentError::InvalidPhase {
                phase,
                expected: UnlinkPhase::Transfer,
            }),
        }
    }

    /// Applies the confirmed plan to the ledger, all-or-nothing.
    ///
    /// Transfers run against a scratch copy; only a fully successful run
    /// replaces the real ledger, so a mid-way failure leaves every
    /// original assignment ACTIVE. The target's remaining (non-in-flight)
    /// active records are cleared as part of the same unit, and a final
    /// verification guards against partially transferred state surviving
    /// the commit.
    pub fn commit(
        &mut self,
        ledger: &mut StaffAvailabilityLedger,
    ) -> Result<Vec<TransferSummary>, ReassignmentError> {
        self.check_phase(UnlinkPhase::Confirm)?;

        let plan = self.plan();
        let mut scratch = ledger.clone();
        for transfer in &plan {
            scratch
                .transfer(transfer.booking_id, transfer.to_staff)
                .map_err(|source| ReassignmentError::TransferCommit {
                    booking_id: transfer.booking_id,
                    reason: source.to_string(),
                })?;
        }
        scratch.remove_staff(self.target);

        for booking in &self.in_flight {
            let still_owned = scratch
                .active_assignment(booking.booking_id)
                .is_some_and(|a| a.staff_id == self.target);
            if still_owned {
                return Err(ReassignmentError::PartialCommitDetected {
                    staff_id: self.target,
                });
            }
        }

        *ledger = scratch;
        self.phase = UnlinkPhase::Committed;
        Ok(plan)
    }

    fn plan(&self) -> Vec<TransferSummary> {
        self.in_flight
            .iter()
            .filter_map(|b| {
                self.replacements.get(&b.booking_id).map(|to| TransferSummary {
                    booking_id: b.booking_id,
                    from_staff: self.target,
                    to_staff: *to,
                })
            })
            .collect()
    }

    fn check_phase(&self, expected: UnlinkPhase) -> Result<(), ReassignmentError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ReassignmentError::InvalidPhase {
                phase: self.phase,
                expected,
            })
        }
    }

    fn check_replacement(&self, replacement: StaffId) -> Result<(), ReassignmentError> {
        if replacement == self.target {
            return Err(ReassignmentError::SelfTransfer {
                staff_id: replacement,
            });
        }
        if !self.pool.contains(&replacement) {
            return Err(ReassignmentError::ReplacementNotAvailable {
                staff_id: replacement,
            });
        }
        Ok(())
    }
}
