//! In-memory adapters for the collaborator ports.
//!
//! Back the integration tests and the demo binary. The booking store's
//! compare-and-set and batch update take a single write lock, giving the
//! same linearization the real persistence layer provides per row.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};

use fixora_core::booking::Booking;
use fixora_core::payout::PaymentRequest;
use fixora_core::reassignment::TransferSummary;
use fixora_core::schedule::{SlotId, WorkingWindow};
use fixora_shared::types::{BookingId, BusinessId, PaymentLinkId, StaffId};

use crate::store::{
    BookingStore, Notifier, PaymentGatewayError, PaymentIntentService, PaymentLink, StaffDirectory,
    StaffMember, StoreError,
};

#[derive(Default)]
struct BookingTables {
    bookings: HashMap<BookingId, Booking>,
    windows: HashMap<BusinessId, WorkingWindow>,
    requests: HashMap<BookingId, PaymentRequest>,
}

/// In-memory booking store.
#[derive(Default)]
pub struct InMemoryBookingStore {
    tables: RwLock<BookingTables>,
}

impl InMemoryBookingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.bookings.contains_key(&booking.id) {
            return Err(StoreError::AlreadyExists);
        }
        tables.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn fetch(&self, id: BookingId) -> Result<Booking, StoreError> {
        self.tables
            .read()
            .await
            .bookings
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, booking: Booking, expected_version: u64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .bookings
            .get_mut(&booking.id)
            .ok_or(StoreError::NotFound)?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                found: stored.version,
            });
        }
        *stored = booking;
        Ok(())
    }

    async fn update_many(&self, bookings: Vec<(Booking, u64)>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        // Validate every version before writing anything.
        for (booking, expected) in &bookings {
            let stored = tables
                .bookings
                .get(&booking.id)
                .ok_or(StoreError::NotFound)?;
            if stored.version != *expected {
                return Err(StoreError::VersionConflict {
                    expected: *expected,
                    found: stored.version,
                });
            }
        }
        for (booking, _) in bookings {
            tables.bookings.insert(booking.id, booking);
        }
        Ok(())
    }

    async fn find_by_slot(
        &self,
        business_id: BusinessId,
        date: NaiveDate,
        slot_id: SlotId,
    ) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.business_id == business_id && b.date == date && b.slot_id == slot_id)
            .cloned()
            .collect())
    }

    async fn assigned_to_staff(&self, staff_id: StaffId) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.assigned_staff_id == Some(staff_id))
            .cloned()
            .collect())
    }

    async fn save_window(
        &self,
        business_id: BusinessId,
        window: WorkingWindow,
    ) -> Result<(), StoreError> {
        self.tables.write().await.windows.insert(business_id, window);
        Ok(())
    }

    async fn fetch_window(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<WorkingWindow>, StoreError> {
        Ok(self.tables.read().await.windows.get(&business_id).copied())
    }

    async fn insert_payment_request(&self, request: PaymentRequest) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.requests.contains_key(&request.booking_id) {
            return Err(StoreError::AlreadyExists);
        }
        tables.requests.insert(request.booking_id, request);
        Ok(())
    }

    async fn fetch_payment_request(
        &self,
        booking_id: BookingId,
    ) -> Result<PaymentRequest, StoreError> {
        self.tables
            .read()
            .await
            .requests
            .get(&booking_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_payment_request(&self, request: PaymentRequest) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.requests.contains_key(&request.booking_id) {
            return Err(StoreError::NotFound);
        }
        tables.requests.insert(request.booking_id, request);
        Ok(())
    }
}

/// In-memory staff directory.
#[derive(Default)]
pub struct InMemoryStaffDirectory {
    staff: RwLock<Vec<StaffMember>>,
    /// When set, the next unlink call fails (for commit-failure tests).
    fail_next_unlink: AtomicBool,
}

impl InMemoryStaffDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employment link.
    pub async fn add_staff(&self, member: StaffMember) {
        self.staff.write().await.push(member);
    }

    /// Makes the next `unlink` call fail.
    pub fn fail_next_unlink(&self) {
        self.fail_next_unlink.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl StaffDirectory for InMemoryStaffDirectory {
    async fn staff_for_business(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<StaffMember>, StoreError> {
        Ok(self
            .staff
            .read()
            .await
            .iter()
            .filter(|m| m.business_id == business_id)
            .cloned()
            .collect())
    }

    async fn is_linked(
        &self,
        staff_id: StaffId,
        business_id: BusinessId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .staff
            .read()
            .await
            .iter()
            .any(|m| m.id == staff_id && m.business_id == business_id))
    }

    async fn unlink(&self, staff_id: StaffId, business_id: BusinessId) -> Result<(), StoreError> {
        if self.fail_next_unlink.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated unlink failure".to_string()));
        }
        let mut staff = self.staff.write().await;
        let before = staff.len();
        staff.retain(|m| !(m.id == staff_id && m.business_id == business_id));
        if staff.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn relink(&self, member: StaffMember) -> Result<(), StoreError> {
        self.staff.write().await.push(member);
        Ok(())
    }
}

/// Events captured by the stub payment gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// A link was issued.
    LinkIssued(BookingId),
    /// A refund was executed.
    Refunded(BookingId),
    /// A staff payout was executed.
    PaidOut(BookingId, StaffId),
}

/// Stub payment gateway recording every call.
#[derive(Default)]
pub struct StubPaymentGateway {
    calls: Mutex<Vec<GatewayCall>>,
    fail_next_payout: AtomicBool,
}

impl StubPaymentGateway {
    /// Creates a fresh stub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `payout` call fail.
    pub fn fail_next_payout(&self) {
        self.fail_next_payout.store(true, Ordering::SeqCst);
    }

    /// The calls recorded so far.
    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl PaymentIntentService for StubPaymentGateway {
    async fn create_link(
        &self,
        booking_id: BookingId,
        _amount: Decimal,
        expires_at: DateTime<Utc>,
    ) -> Result<PaymentLink, PaymentGatewayError> {
        let id = PaymentLinkId::new();
        self.calls.lock().await.push(GatewayCall::LinkIssued(booking_id));
        Ok(PaymentLink {
            id,
            url: format!("https://pay.example/{id}"),
            expires_at,
        })
    }

    async fn refund(
        &self,
        booking_id: BookingId,
        _amount: Decimal,
    ) -> Result<(), PaymentGatewayError> {
        self.calls.lock().await.push(GatewayCall::Refunded(booking_id));
        Ok(())
    }

    async fn payout(
        &self,
        booking_id: BookingId,
        staff_id: StaffId,
        _amount: Decimal,
    ) -> Result<(), PaymentGatewayError> {
        if self.fail_next_payout.swap(false, Ordering::SeqCst) {
            return Err(PaymentGatewayError::Unavailable(
                "simulated payout failure".to_string(),
            ));
        }
        self.calls
            .lock()
            .await
            .push(GatewayCall::PaidOut(booking_id, staff_id));
        Ok(())
    }
}

/// Notification events captured by the recording sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A booking was migrated to a replacement staff member.
    Transferred(TransferSummary),
    /// A booking was cancelled.
    Cancelled(BookingId, Option<String>),
}

/// Notification sink recording every event.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    /// Creates a fresh sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events recorded so far.
    pub async fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn transfer_completed(&self, summary: &TransferSummary) {
        self.events
            .lock()
            .await
            .push(NotificationEvent::Transferred(*summary));
    }

    async fn booking_cancelled(&self, booking_id: BookingId, reason: Option<&str>) {
        self.events.lock().await.push(NotificationEvent::Cancelled(
            booking_id,
            reason.map(ToString::to_string),
        ));
    }
}
