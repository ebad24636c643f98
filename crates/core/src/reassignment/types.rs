//! Workflow phases and transfer plan types.

use serde::{Deserialize, Serialize};
use std::fmt;

use fixora_shared::types::{BookingId, StaffId};

use crate::booking::types::TrackingStatus;

/// Phase of the staff-unlink workflow.
///
/// `Check` inspects in-flight work; with none, the workflow jumps
/// straight to `Confirm`. Otherwise every in-flight booking needs a
/// replacement before `Confirm`, and `Committed` applies the whole plan
/// atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlinkPhase {
    /// Discovering in-flight bookings.
    Check,
    /// Collecting replacement selections.
    Transfer,
    /// Plan complete; awaiting operator confirmation.
    Confirm,
    /// Plan applied and employment link severed.
    Committed,
}

impl UnlinkPhase {
    /// Returns the string representation of the phase.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Transfer => "transfer",
            Self::Confirm => "confirm",
            Self::Committed => "committed",
        }
    }
}

impl fmt::Display for UnlinkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An in-flight booking discovered by the CHECK phase: confirmed, not yet
/// completed, owned by the staff member being unlinked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlightBooking {
    /// The booking.
    pub booking_id: BookingId,
    /// Where its tracking currently stands.
    pub tracking: TrackingStatus,
}

/// One booking's migration: old owner to replacement.
///
/// Doubles as the per-booking transfer-summary event handed to the
/// notification collaborator after commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSummary {
    /// The migrated booking.
    pub booking_id: BookingId,
    /// The staff member being unlinked.
    pub from_staff: StaffId,
    /// The replacement taking over.
    pub to_staff: StaffId,
}
