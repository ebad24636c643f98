//! Payment request and split types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use fixora_shared::types::BookingId;

/// Status of a staff payment request.
///
/// Valid transitions: Pending → Paid (payout success), Pending → Failed
/// (payout failure, may be re-queued to Pending), Pending → Cancelled
/// (provider rejects). Paid and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRequestStatus {
    /// Awaiting provider approval / payout execution.
    Pending,
    /// Payout completed (terminal).
    Paid,
    /// Payout failed; may be re-queued.
    Failed,
    /// Rejected by the provider (terminal).
    Cancelled,
}

impl PaymentRequestStatus {
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

    /// Returns true if no transition leads out of this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

impl fmt::Display for PaymentRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of splitting a booking amount between staff and platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// The staff payout, rounded down.
    pub staff_amount: Decimal,
    /// What the platform retains.
    pub platform_amount: Decimal,
}

/// A staff payout request derived from a completed, paid booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// The booking being paid out.
    pub booking_id: BookingId,
    /// The booking's service price.
    pub requested_amount: Decimal,
    /// Configured staff percentage, in (0, 100].
    pub percentage: Decimal,
    /// The staff share: `floor(requested_amount × percentage / 100)`.
    pub staff_amount: Decimal,
    /// Request status.
    pub status: PaymentRequestStatus,
    /// Provider's reason when the request was rejected.
    pub rejection_reason: Option<String>,
    /// When the request was created.
    pub requested_at: DateTime<Utc>,
}
