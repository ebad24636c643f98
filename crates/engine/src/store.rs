//! Collaborator ports.
//!
//! The booking/staff/payment state lives behind a persistence layer
//! external to this engine; these traits are the seams the dashboards'
//! backend plugs real adapters into. The in-memory implementations in
//! [`crate::memory`] back the tests and the demo binary.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fixora_core::booking::Booking;
use fixora_core::payout::PaymentRequest;
use fixora_core::reassignment::TransferSummary;
use fixora_core::schedule::{SlotId, WorkingWindow};
use fixora_shared::types::{BookingId, BusinessId, PaymentLinkId, StaffId};

/// Errors surfaced by store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("Record not found")]
    NotFound,

    /// A record with the same key already exists.
    #[error("Record already exists")]
    AlreadyExists,

    /// Compare-and-set lost the race: the record moved on.
    #[error("Version conflict: expected {expected}, found {found}")]
    VersionConflict {
        /// The version the caller read.
        expected: u64,
        /// The version actually stored.
        found: u64,
    },

    /// Backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the payment gateway port.
#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    /// The gateway refused the operation.
    #[error("Payment gateway rejected the operation: {0}")]
    Rejected(String),

    /// The gateway could not be reached.
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
}

/// An out-of-band payment link handed to the customer at checkout.
///
/// The expiry here is advisory for the client countdown; the authoritative
/// deadline is the one persisted on the booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Link identifier at the gateway.
    pub id: PaymentLinkId,
    /// Checkout URL for the customer.
    pub url: String,
    /// When the link stops being usable.
    pub expires_at: DateTime<Utc>,
}

/// A staff member as seen through the directory port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Staff identifier.
    pub id: StaffId,
    /// Employing business.
    pub business_id: BusinessId,
    /// Display name for dropdowns and summaries.
    pub display_name: String,
}

/// Persistence port for bookings, working windows and payment requests.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts a new booking.
    async fn insert(&self, booking: Booking) -> Result<(), StoreError>;

    /// Fetches a booking by id.
    async fn fetch(&self, id: BookingId) -> Result<Booking, StoreError>;

    /// Replaces a booking if the stored version matches `expected_version`.
    ///
    /// The compare-and-set is the engine's linearization point per
    /// booking: the loser of a race gets `VersionConflict`.
    async fn update(&self, booking: Booking, expected_version: u64) -> Result<(), StoreError>;

    /// Replaces several bookings as one all-or-nothing unit.
    ///
    /// Every version must match or nothing is written. This is the
    /// multi-row transaction used by the reassignment commit.
    async fn update_many(&self, bookings: Vec<(Booking, u64)>) -> Result<(), StoreError>;

    /// Bookings occupying a slot on a date for a business.
    async fn find_by_slot(
        &self,
        business_id: BusinessId,
        date: NaiveDate,
        slot_id: SlotId,
    ) -> Result<Vec<Booking>, StoreError>;

    /// All bookings currently assigned to a staff member.
    async fn assigned_to_staff(&self, staff_id: StaffId) -> Result<Vec<Booking>, StoreError>;

    /// Persists a business's working window, replacing any previous one.
    async fn save_window(
        &self,
        business_id: BusinessId,
        window: WorkingWindow,
    ) -> Result<(), StoreError>;

    /// Fetches a business's working window, if configured.
    async fn fetch_window(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<WorkingWindow>, StoreError>;

    /// Persists a new payment request (one per booking).
    async fn insert_payment_request(&self, request: PaymentRequest) -> Result<(), StoreError>;

    /// Fetches the payment request for a booking.
    async fn fetch_payment_request(
        &self,
        booking_id: BookingId,
    ) -> Result<PaymentRequest, StoreError>;

    /// Replaces the payment request for a booking.
    async fn update_payment_request(&self, request: PaymentRequest) -> Result<(), StoreError>;
}

/// Directory port for staff employment links.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Staff employed by a business.
    async fn staff_for_business(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<StaffMember>, StoreError>;

    /// Whether a staff member is employed by a business.
    async fn is_linked(
        &self,
        staff_id: StaffId,
        business_id: BusinessId,
    ) -> Result<bool, StoreError>;

    /// Severs a staff member's employment link.
    async fn unlink(&self, staff_id: StaffId, business_id: BusinessId) -> Result<(), StoreError>;

    /// Restores a staff member's employment link (compensation path).
    async fn relink(&self, staff: StaffMember) -> Result<(), StoreError>;
}

/// Payment gateway port (link issuance, refunds, staff payouts).
#[async_trait]
pub trait PaymentIntentService: Send + Sync {
    /// Issues a checkout payment link for a booking.
    async fn create_link(
        &self,
        booking_id: BookingId,
        amount: Decimal,
        expires_at: DateTime<Utc>,
    ) -> Result<PaymentLink, PaymentGatewayError>;

    /// Refunds (or declines to capture) a booking's payment.
    async fn refund(&self, booking_id: BookingId, amount: Decimal)
        -> Result<(), PaymentGatewayError>;

    /// Executes a staff payout.
    async fn payout(
        &self,
        booking_id: BookingId,
        staff_id: StaffId,
        amount: Decimal,
    ) -> Result<(), PaymentGatewayError>;
}

/// Notification sink for events the engine must emit.
///
/// Delivery is the notification collaborator's concern; the engine only
/// hands over the facts and never fails an operation on a sink error.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A booking was migrated to a replacement staff member.
    async fn transfer_completed(&self, summary: &TransferSummary);

    /// A booking was cancelled.
    async fn booking_cancelled(&self, booking_id: BookingId, reason: Option<&str>);
}
