//! The `BookingEngine` facade.
//!
//! One method per external operation (§ checkout, payment webhooks, staff
//! tracking, cancellation, working hours, staff unlink, payment
//! requests). Each executes within a single request boundary: fetch,
//! validate through the core services, commit through compare-and-set.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use fixora_core::booking::{
    Booking, BookingActions, BookingError, BookingService, BookingState, BookingStatus,
    BookingTransition, PaymentStatus, TrackingStatus, TransitionKind,
};
use fixora_core::payout::{PaymentRequest, PayoutService};
use fixora_core::reassignment::{
    InFlightBooking, ReassignmentCoordinator, ReassignmentError, TransferSummary,
};
use fixora_core::schedule::{Slot, SlotGenerator, SlotId, WorkingWindow};
use fixora_core::staffing::StaffAvailabilityLedger;
use fixora_shared::config::AppConfig;
use fixora_shared::types::{BookingId, BusinessId, CustomerId, ServiceId, StaffId};

use crate::error::{EngineError, EngineResult};
use crate::store::{
    BookingStore, Notifier, PaymentIntentService, PaymentLink, StaffDirectory, StoreError,
};

/// Input for creating a booking from a confirmed cart checkout.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// The booked service offering.
    pub service_id: ServiceId,
    /// The booking customer.
    pub customer_id: CustomerId,
    /// The provider business.
    pub business_id: BusinessId,
    /// Service date.
    pub date: NaiveDate,
    /// The chosen slot.
    pub slot_id: SlotId,
    /// Total service price.
    pub total_amount: Decimal,
    /// Whether checkout requires an out-of-band payment link.
    pub with_payment_link: bool,
}

/// Result of creating a booking.
#[derive(Debug, Clone)]
pub struct CreatedBooking {
    /// The stored booking.
    pub booking: Booking,
    /// The payment link handle, when one was requested.
    pub payment_link: Option<PaymentLink>,
}

/// Outcome reported by the payment webhook receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Capture succeeded.
    Paid,
    /// Capture failed.
    Failed,
}

/// The booking lifecycle and staff-resource engine.
///
/// Generic over the collaborator ports; the in-memory adapters in
/// [`crate::memory`] satisfy them for tests and demos.
pub struct BookingEngine<S, D, P, N> {
    bookings: S,
    directory: D,
    payments: P,
    notifier: N,
    /// Per-staff busy/available bookkeeping. The single lock serializes
    /// assignment check-and-set; the required discipline is per-staff,
    /// which this conservatively subsumes.
    ledger: Mutex<StaffAvailabilityLedger>,
    /// Staff whose unlink hit a failed compensation; manual
    /// reconciliation required before further automated processing.
    halted_unlinks: Mutex<HashSet<StaffId>>,
    config: AppConfig,
}

impl<S, D, P, N> BookingEngine<S, D, P, N>
where
    S: BookingStore,
    D: StaffDirectory,
    P: PaymentIntentService,
    N: Notifier,
{
    /// Creates an engine over the given collaborator ports.
    pub fn new(bookings: S, directory: D, payments: P, notifier: N, config: AppConfig) -> Self {
        Self {
            bookings,
            directory,
            payments,
            notifier,
            ledger: Mutex::new(StaffAvailabilityLedger::new()),
            halted_unlinks: Mutex::new(HashSet::new()),
            config,
        }
    }

    /// The booking store port.
    pub fn bookings(&self) -> &S {
        &self.bookings
    }

    /// The staff directory port.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// The payment gateway port.
    pub fn payments(&self) -> &P {
        &self.payments
    }

    /// The notification sink port.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ------------------------------------------------------------------
    // Working hours
    // ------------------------------------------------------------------

    /// Previews how many slots a candidate duration would yield.
    pub fn preview_slot_count(
        &self,
        window: &WorkingWindow,
        candidate_duration_minutes: u32,
    ) -> EngineResult<usize> {
        Ok(SlotGenerator::preview_slot_count(
            window,
            candidate_duration_minutes,
        )?)
    }

    /// Validates and persists a business's working window.
    pub async fn commit_working_window(
        &self,
        business_id: BusinessId,
        window: WorkingWindow,
    ) -> EngineResult<()> {
        window.validate().map_err(EngineError::from)?;
        self.bookings.save_window(business_id, window).await?;
        info!(business_id = %business_id, "Working window committed");
        Ok(())
    }

    /// The day's slot inventory for a business.
    pub async fn slots_for(&self, business_id: BusinessId) -> EngineResult<Vec<Slot>> {
        let window = self
            .bookings
            .fetch_window(business_id)
            .await?
            .ok_or(EngineError::WindowNotConfigured(business_id))?;
        Ok(SlotGenerator::generate_slots(&window)?)
    }

    // ------------------------------------------------------------------
    // Booking lifecycle
    // ------------------------------------------------------------------

    /// Creates a booking from a confirmed cart checkout.
    ///
    /// The slot must exist in the business's generated inventory and be
    /// free on the requested date. When a payment link is requested the
    /// returned deadline is authoritative server-side.
    pub async fn create_booking(&self, new: NewBooking) -> EngineResult<CreatedBooking> {
        let window = self
            .bookings
            .fetch_window(new.business_id)
            .await?
            .ok_or(EngineError::WindowNotConfigured(new.business_id))?;
        let inventory = SlotGenerator::generate_slots(&window)?;
        if !inventory.iter().any(|s| s.id == new.slot_id) {
            return Err(EngineError::UnknownSlot {
                slot_id: new.slot_id,
            });
        }

        let occupying = self
            .bookings
            .find_by_slot(new.business_id, new.date, new.slot_id)
            .await?;
        if occupying.iter().any(|b| !b.state.is_terminal()) {
            return Err(EngineError::SlotTaken {
                slot_id: new.slot_id,
                date: new.date,
            });
        }

        let now = Utc::now();
        let mut booking = Booking {
            id: BookingId::new(),
            service_id: new.service_id,
            customer_id: new.customer_id,
            business_id: new.business_id,
            date: new.date,
            slot_id: new.slot_id,
            state: BookingState::initial(new.with_payment_link),
            assigned_staff_id: None,
            total_amount: new.total_amount,
            payment_link_expires_at: None,
            feedback_recorded: false,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let payment_link = if new.with_payment_link {
            let expires_at = now + Duration::minutes(self.config.payment.link_expiry_minutes);
            let link = self
                .payments
                .create_link(booking.id, booking.total_amount, expires_at)
                .await?;
            booking.payment_link_expires_at = Some(expires_at);
            Some(link)
        } else {
            None
        };

        self.bookings.insert(booking.clone()).await?;
        info!(
            booking_id = %booking.id,
            slot_id = %booking.slot_id,
            date = %booking.date,
            "Booking created"
        );
        Ok(CreatedBooking {
            booking,
            payment_link,
        })
    }

    /// Applies a payment webhook result.
    ///
    /// `received_at` is the webhook receipt instant; a success arriving
    /// after the authoritative link deadline is rejected and the amount
    /// refunded rather than silently confirming an expired booking.
    pub async fn on_payment_result(
        &self,
        booking_id: BookingId,
        outcome: PaymentOutcome,
        received_at: DateTime<Utc>,
    ) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;

        match outcome {
            PaymentOutcome::Paid => {
                if let Some(expires_at) = booking.payment_link_expires_at {
                    if received_at > expires_at {
                        warn!(
                            booking_id = %booking_id,
                            expired_at = %expires_at,
                            "Payment success after link expiry, refunding"
                        );
                        self.payments
                            .refund(booking_id, booking.total_amount)
                            .await?;
                        return Err(BookingError::PaymentLinkExpired {
                            booking_id,
                            expired_at: expires_at,
                        }
                        .into());
                    }
                }
                let transition = BookingService::confirm_payment(booking.state)?;
                self.apply_transition(booking, &transition).await
            }
            PaymentOutcome::Failed => {
                let transition = BookingService::fail_payment(booking.state)?;
                self.apply_transition(booking, &transition).await
            }
        }
    }

    /// Issues a fresh payment link after failure or expiry.
    pub async fn reissue_payment_link(
        &self,
        booking_id: BookingId,
    ) -> EngineResult<(Booking, PaymentLink)> {
        let booking = self.fetch_booking(booking_id).await?;
        let transition = BookingService::reissue_payment_link(booking.state)?;

        let expires_at = Utc::now() + Duration::minutes(self.config.payment.link_expiry_minutes);
        let link = self
            .payments
            .create_link(booking.id, booking.total_amount, expires_at)
            .await?;

        let expected = booking.version;
        let mut updated = booking;
        updated.state = transition.new_state();
        updated.payment_link_expires_at = Some(expires_at);
        let updated = self.commit_booking(updated, expected).await?;
        Ok((updated, link))
    }

    /// Provider confirmation of a pending (pay-on-site) booking.
    pub async fn confirm_booking(&self, booking_id: BookingId) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        let transition = BookingService::confirm(booking.state)?;
        self.apply_transition(booking, &transition).await
    }

    /// Assigns a staff member to a booking.
    ///
    /// The staff member must belong to the booking's business. A BUSY
    /// target is refused unless the caller overrides, and the override is
    /// granted only for future-dated, not-yet-started bookings.
    pub async fn assign_staff(
        &self,
        booking_id: BookingId,
        staff_id: StaffId,
        override_busy: bool,
    ) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        if booking.state.is_terminal() {
            return Err(BookingError::InvalidTransition {
                from: booking.state,
                action: TransitionKind::AssignStaff,
            }
            .into());
        }
        if !self
            .directory
            .is_linked(staff_id, booking.business_id)
            .await?
        {
            return Err(EngineError::StaffNotLinked {
                staff_id,
                business_id: booking.business_id,
            });
        }

        let override_allowed = override_busy
            && booking.date > Utc::now().date_naive()
            && booking.state.tracking == TrackingStatus::NotStarted;

        {
            let mut ledger = self.ledger.lock().await;
            ledger.assign(staff_id, booking_id, override_allowed)?;
        }

        let expected = booking.version;
        let mut updated = booking;
        updated.assigned_staff_id = Some(staff_id);
        let result = self.commit_booking(updated, expected).await;
        if result.is_err() {
            // Undo the ledger entry so a lost CAS race leaves no orphan.
            let mut ledger = self.ledger.lock().await;
            ledger.release(booking_id);
        } else {
            info!(booking_id = %booking_id, staff_id = %staff_id, "Staff assigned");
        }
        result
    }

    /// Advances a booking's tracking status one step.
    ///
    /// Only the assigned staff member may advance; concurrent attempts on
    /// the same booking are linearized by the store, the loser observing
    /// `STALE_TRANSITION`.
    pub async fn advance_tracking(
        &self,
        booking_id: BookingId,
        staff_id: StaffId,
        to: TrackingStatus,
    ) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        if booking.assigned_staff_id != Some(staff_id) {
            return Err(EngineError::NotAssignedStaff {
                staff_id,
                booking_id,
            });
        }
        // A caller targeting the status the booking already reached raced
        // another device and lost; report the stale read, not an ordering
        // violation.
        if booking.state.tracking == to {
            return Err(BookingError::StaleTransition {
                booking_id,
                expected_version: booking.version,
            }
            .into());
        }

        let transition = BookingService::advance_tracking(booking.state, to, staff_id)?;
        let updated = self.apply_transition(booking, &transition).await?;

        let mut ledger = self.ledger.lock().await;
        ledger.note_tracking(booking_id, to);
        drop(ledger);

        info!(
            booking_id = %booking_id,
            staff_id = %staff_id,
            tracking = %to,
            "Tracking advanced"
        );
        Ok(updated)
    }

    /// Customer cancellation request.
    pub async fn request_cancellation(
        &self,
        booking_id: BookingId,
        customer_id: CustomerId,
    ) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        if booking.customer_id != customer_id {
            return Err(EngineError::NotBookingOwner { booking_id });
        }
        let transition = BookingService::request_cancellation(booking.state, customer_id)?;
        self.apply_transition(booking, &transition).await
    }

    /// Provider/refund acknowledgement completing a cancellation.
    ///
    /// Captured payments are refunded, the staff assignment (if any) is
    /// released, and the cancellation event goes to the notifier.
    pub async fn finalize_cancellation(&self, booking_id: BookingId) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        let transition = BookingService::finalize_cancellation(booking.state)?;
        self.complete_cancellation(booking, &transition, None).await
    }

    /// Business-side direct cancellation (required reason).
    pub async fn cancel_by_business(
        &self,
        booking_id: BookingId,
        reason: String,
    ) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        let transition = BookingService::cancel_by_business(booking.state, reason.clone())?;
        self.complete_cancellation(booking, &transition, Some(reason))
            .await
    }

    /// Records customer feedback on a completed booking.
    ///
    /// Re-submission is rejected, never overwritten.
    pub async fn record_feedback(&self, booking_id: BookingId) -> EngineResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        BookingService::record_feedback(&booking)?;

        let expected = booking.version;
        let mut updated = booking;
        updated.feedback_recorded = true;
        self.commit_booking(updated, expected).await
    }

    /// Derived action eligibility for the dashboards.
    pub async fn booking_actions(&self, booking_id: BookingId) -> EngineResult<BookingActions> {
        let booking = self.fetch_booking(booking_id).await?;
        Ok(BookingActions::derive(&booking))
    }

    /// Whether a staff member may take new work right now.
    pub async fn staff_available(&self, staff_id: StaffId) -> bool {
        self.ledger.lock().await.is_available(staff_id)
    }

    // ------------------------------------------------------------------
    // Staff unlink
    // ------------------------------------------------------------------

    /// Starts the unlink workflow for a staff member.
    ///
    /// Performs the CHECK phase: discovers the target's in-flight
    /// bookings (confirmed, tracking not completed) and the pool of
    /// available same-business replacements.
    pub async fn begin_unlink(
        &self,
        business_id: BusinessId,
        staff_id: StaffId,
    ) -> EngineResult<ReassignmentCoordinator> {
        if self.halted_unlinks.lock().await.contains(&staff_id) {
            return Err(EngineError::UnlinkHalted { staff_id });
        }
        if !self.directory.is_linked(staff_id, business_id).await? {
            return Err(EngineError::StaffNotLinked {
                staff_id,
                business_id,
            });
        }

        let assigned = self.bookings.assigned_to_staff(staff_id).await?;
        let in_flight: Vec<InFlightBooking> = assigned
            .iter()
            .filter(|b| {
                b.state.booking == BookingStatus::Confirmed
                    && b.state.tracking != TrackingStatus::Completed
            })
            .map(|b| InFlightBooking {
                booking_id: b.id,
                tracking: b.state.tracking,
            })
            .collect();

        let ledger = self.ledger.lock().await;
        let pool: Vec<StaffId> = self
            .directory
            .staff_for_business(business_id)
            .await?
            .into_iter()
            .map(|m| m.id)
            .filter(|id| *id != staff_id && ledger.is_available(*id))
            .collect();
        drop(ledger);

        info!(
            staff_id = %staff_id,
            in_flight = in_flight.len(),
            pool = pool.len(),
            "Unlink check complete"
        );
        Ok(ReassignmentCoordinator::begin(
            business_id,
            staff_id,
            in_flight,
            pool,
        ))
    }

    /// Commits a confirmed unlink plan: the one multi-row transaction.
    ///
    /// Rewrites every transferred booking's assignment (atomic batch),
    /// severs the employment link, applies the transfers to the ledger,
    /// and emits one transfer-summary event per booking. Any failure
    /// compensates so the target stays linked and every original
    /// assignment stays ACTIVE; a failed compensation halts this staff
    /// member's unlink processing entirely.
    pub async fn commit_unlink(
        &self,
        coordinator: &mut ReassignmentCoordinator,
    ) -> EngineResult<Vec<TransferSummary>> {
        let target = coordinator.target();
        let business_id = coordinator.business_id();

        if self.halted_unlinks.lock().await.contains(&target) {
            return Err(EngineError::UnlinkHalted { staff_id: target });
        }

        // Refuses while coverage is incomplete; no mutation yet.
        let plan = coordinator.confirm()?;

        // Prepare the batch of booking rewrites.
        let mut originals = Vec::with_capacity(plan.len());
        let mut updates = Vec::with_capacity(plan.len());
        for transfer in &plan {
            let booking = self.fetch_booking(transfer.booking_id).await?;
            let expected = booking.version;
            let mut updated = booking.clone();
            updated.assigned_staff_id = Some(transfer.to_staff);
            updated.version = expected + 1;
            updated.updated_at = Utc::now();
            originals.push((booking, expected + 1));
            updates.push((updated, expected));
        }

        self.bookings
            .update_many(updates)
            .await
            .map_err(|e| Self::commit_failure(&plan, &e))?;

        if let Err(e) = self.directory.unlink(target, business_id).await {
            // Compensate the booking rewrites; staff stays linked.
            error!(staff_id = %target, error = %e, "Unlink failed, compensating transfers");
            let restore: Vec<(Booking, u64)> = originals
                .into_iter()
                .map(|(mut b, expected)| {
                    b.version = expected + 1;
                    (b, expected)
                })
                .collect();
            if let Err(restore_err) = self.bookings.update_many(restore).await {
                error!(
                    staff_id = %target,
                    error = %restore_err,
                    "Compensation failed, halting unlink processing"
                );
                self.halted_unlinks.lock().await.insert(target);
                return Err(ReassignmentError::PartialCommitDetected { staff_id: target }.into());
            }
            return Err(Self::commit_failure(&plan, &e));
        }

        // Apply the transfers to the ledger (internally all-or-nothing).
        let mut ledger = self.ledger.lock().await;
        match coordinator.commit(&mut ledger) {
            Ok(summaries) => {
                drop(ledger);
                for summary in &summaries {
                    self.notifier.transfer_completed(summary).await;
                }
                info!(
                    staff_id = %target,
                    transfers = summaries.len(),
                    "Unlink committed"
                );
                Ok(summaries)
            }
            Err(e) => {
                drop(ledger);
                // Bookings rewritten and staff unlinked, but the ledger
                // refused: partially transferred state. Halt this staff
                // member until manually reconciled.
                error!(staff_id = %target, error = %e, "Ledger commit failed after unlink");
                self.halted_unlinks.lock().await.insert(target);
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------
    // Payment requests
    // ------------------------------------------------------------------

    /// Creates a staff payment request for a completed, paid booking.
    pub async fn create_payment_request(
        &self,
        booking_id: BookingId,
        percentage: Option<Decimal>,
    ) -> EngineResult<PaymentRequest> {
        let booking = self.fetch_booking(booking_id).await?;
        let percentage = percentage
            .unwrap_or_else(|| Decimal::from(self.config.payout.default_staff_percentage));
        let request = PayoutService::build_request(&booking, percentage)?;

        match self.bookings.insert_payment_request(request.clone()).await {
            Ok(()) => Ok(request),
            Err(StoreError::AlreadyExists) => Err(EngineError::PaymentRequestExists(booking_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Provider approves the request; the gateway executes the payout.
    ///
    /// Gateway failure marks the request FAILED (re-queueable) instead of
    /// leaving it dangling.
    pub async fn approve_payment_request(
        &self,
        booking_id: BookingId,
    ) -> EngineResult<PaymentRequest> {
        let mut request = self.fetch_payment_request(booking_id).await?;
        let booking = self.fetch_booking(booking_id).await?;
        let Some(staff_id) = booking.assigned_staff_id else {
            return Err(EngineError::NoAssignedStaff(booking_id));
        };

        let approved = PayoutService::approve(request.status)?;
        match self
            .payments
            .payout(booking_id, staff_id, request.staff_amount)
            .await
        {
            Ok(()) => {
                request.status = approved;
                self.bookings.update_payment_request(request.clone()).await?;
                info!(
                    booking_id = %booking_id,
                    staff_id = %staff_id,
                    amount = %request.staff_amount,
                    "Payout executed"
                );
                Ok(request)
            }
            Err(e) => {
                warn!(booking_id = %booking_id, error = %e, "Payout failed");
                request.status = PayoutService::fail(request.status)?;
                self.bookings.update_payment_request(request).await?;
                Err(e.into())
            }
        }
    }

    /// Marks a pending request FAILED without touching the gateway.
    pub async fn fail_payment_request(&self, booking_id: BookingId) -> EngineResult<PaymentRequest> {
        let mut request = self.fetch_payment_request(booking_id).await?;
        request.status = PayoutService::fail(request.status)?;
        self.bookings.update_payment_request(request.clone()).await?;
        Ok(request)
    }

    /// Re-queues a failed request for another payout attempt.
    pub async fn requeue_payment_request(
        &self,
        booking_id: BookingId,
    ) -> EngineResult<PaymentRequest> {
        let mut request = self.fetch_payment_request(booking_id).await?;
        request.status = PayoutService::requeue(request.status)?;
        self.bookings.update_payment_request(request.clone()).await?;
        Ok(request)
    }

    /// Provider rejects the request; a non-empty reason is required.
    pub async fn reject_payment_request(
        &self,
        booking_id: BookingId,
        reason: String,
    ) -> EngineResult<PaymentRequest> {
        let mut request = self.fetch_payment_request(booking_id).await?;
        request.status = PayoutService::reject(request.status, &reason)?;
        request.rejection_reason = Some(reason);
        self.bookings.update_payment_request(request.clone()).await?;
        Ok(request)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn fetch_booking(&self, booking_id: BookingId) -> EngineResult<Booking> {
        let booking = match self.bookings.fetch(booking_id).await {
            Ok(b) => b,
            Err(StoreError::NotFound) => return Err(EngineError::BookingNotFound(booking_id)),
            Err(e) => return Err(e.into()),
        };
        if !booking.state.is_valid() {
            error!(
                booking_id = %booking_id,
                state = %booking.state,
                "Invalid state combination in storage"
            );
            return Err(BookingError::InvalidState {
                booking_id,
                state: booking.state,
            }
            .into());
        }
        Ok(booking)
    }

    async fn fetch_payment_request(&self, booking_id: BookingId) -> EngineResult<PaymentRequest> {
        match self.bookings.fetch_payment_request(booking_id).await {
            Ok(r) => Ok(r),
            Err(StoreError::NotFound) => Err(EngineError::PaymentRequestNotFound(booking_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Persists a transition's resulting state through compare-and-set.
    async fn apply_transition(
        &self,
        booking: Booking,
        transition: &BookingTransition,
    ) -> EngineResult<Booking> {
        let expected = booking.version;
        let mut updated = booking;
        updated.state = transition.new_state();
        self.commit_booking(updated, expected).await
    }

    async fn commit_booking(&self, mut booking: Booking, expected: u64) -> EngineResult<Booking> {
        booking.version = expected + 1;
        booking.updated_at = Utc::now();
        match self.bookings.update(booking.clone(), expected).await {
            Ok(()) => Ok(booking),
            Err(StoreError::VersionConflict { .. }) => Err(BookingError::StaleTransition {
                booking_id: booking.id,
                expected_version: expected,
            }
            .into()),
            Err(StoreError::NotFound) => Err(EngineError::BookingNotFound(booking.id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Shared cancellation tail: refund, release staff, notify.
    async fn complete_cancellation(
        &self,
        booking: Booking,
        transition: &BookingTransition,
        reason: Option<String>,
    ) -> EngineResult<Booking> {
        let was_paid = booking.state.payment == PaymentStatus::Paid;
        let amount = booking.total_amount;
        let updated = self.apply_transition(booking, transition).await?;

        if was_paid && updated.state.payment == PaymentStatus::Cancelled {
            self.payments.refund(updated.id, amount).await?;
        }

        let mut ledger = self.ledger.lock().await;
        ledger.release(updated.id);
        drop(ledger);

        self.notifier
            .booking_cancelled(updated.id, reason.as_deref())
            .await;
        info!(booking_id = %updated.id, "Booking cancelled");
        Ok(updated)
    }

    fn commit_failure(plan: &[TransferSummary], e: &StoreError) -> EngineError {
        let booking_id = plan
            .first()
            .map_or(BookingId::from_uuid(uuid::Uuid::nil()), |t| t.booking_id);
        ReassignmentError::TransferCommit {
            booking_id,
            reason: e.to_string(),
        }
        .into()
    }
}
