//! Fixora demo scenario.
//!
//! Runs a full booking lifecycle against the in-memory adapters: working
//! hours are configured, a slot is booked and paid, a staff member tracks
//! the job to completion, and the payout split is computed and approved.

use chrono::{Days, Utc};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fixora_core::booking::TrackingStatus;
use fixora_core::schedule::{SlotGenerator, SlotId, WorkingWindow};
use fixora_engine::memory::{
    InMemoryBookingStore, InMemoryStaffDirectory, RecordingNotifier, StubPaymentGateway,
};
use fixora_engine::{BookingEngine, NewBooking, PaymentOutcome, StaffMember};
use fixora_shared::config::AppConfig;
use fixora_shared::types::{BusinessId, CustomerId, ServiceId, StaffId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fixora=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration (defaults apply when nothing is configured)
    let config = AppConfig::load().unwrap_or_default();

    let engine = BookingEngine::new(
        InMemoryBookingStore::new(),
        InMemoryStaffDirectory::new(),
        StubPaymentGateway::new(),
        RecordingNotifier::new(),
        config,
    );

    // Provider configures working hours and previews slot durations.
    let business_id = BusinessId::new();
    let window = WorkingWindow::from_hhmm("09:00", "18:00", "13:00", "14:00", 60)?;
    for candidate in [30u32, 60, 90] {
        let count = engine.preview_slot_count(&window, candidate)?;
        info!(candidate_minutes = candidate, slots = count, "Duration preview");
    }
    engine.commit_working_window(business_id, window).await?;

    let inventory = SlotGenerator::generate_slots(&window)?;
    info!(slots = inventory.len(), "Day inventory generated");

    // Staff joins the business.
    let staff_id = StaffId::new();
    engine
        .directory()
        .add_staff(StaffMember {
            id: staff_id,
            business_id,
            display_name: "Dana".to_string(),
        })
        .await;

    // Customer books the 10:00 slot a week out and pays via link.
    let created = engine
        .create_booking(NewBooking {
            service_id: ServiceId::new(),
            customer_id: CustomerId::new(),
            business_id,
            date: Utc::now()
                .date_naive()
                .checked_add_days(Days::new(7))
                .expect("date in range"),
            slot_id: SlotId(10 * 60),
            total_amount: dec!(1000),
            with_payment_link: true,
        })
        .await?;
    let booking_id = created.booking.id;
    if let Some(link) = &created.payment_link {
        info!(url = %link.url, expires_at = %link.expires_at, "Payment link issued");
    }

    engine
        .on_payment_result(booking_id, PaymentOutcome::Paid, Utc::now())
        .await?;
    info!(booking_id = %booking_id, "Payment captured, booking confirmed");

    // Staff works the job to completion.
    engine.assign_staff(booking_id, staff_id, true).await?;
    for step in [
        TrackingStatus::BookingStarted,
        TrackingStatus::ProviderOnTheWay,
        TrackingStatus::ServiceStarted,
        TrackingStatus::Completed,
    ] {
        let booking = engine.advance_tracking(booking_id, staff_id, step).await?;
        info!(
            tracking = %booking.state.tracking,
            booking_status = %booking.state.booking,
            "Tracking advanced"
        );
    }

    // Payout split and approval.
    let request = engine.create_payment_request(booking_id, None).await?;
    info!(
        staff_amount = %request.staff_amount,
        platform_amount = %(request.requested_amount - request.staff_amount),
        "Payment request created"
    );
    let request = engine.approve_payment_request(booking_id).await?;
    info!(status = %request.status, "Payout executed");

    Ok(())
}
