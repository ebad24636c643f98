//! Booking engine orchestration for Fixora.
//!
//! Wires the pure core logic to the external collaborators through
//! store ports: a booking store, a staff directory, a payment-intent
//! service and a notification sink. Every operation executes within a
//! single request/transaction boundary; booking mutations go through
//! compare-and-set so concurrent writers are linearized per booking.
//!
//! # Modules
//!
//! - `store` - Collaborator ports (traits) and their data types
//! - `engine` - The `BookingEngine` facade implementing the operations
//! - `error` - Structured engine error surface
//! - `memory` - In-memory adapters for tests and demos

pub mod engine;
pub mod error;
pub mod memory;
pub mod store;

pub use engine::{BookingEngine, CreatedBooking, NewBooking, PaymentOutcome};
pub use error::EngineError;
pub use store::{
    BookingStore, Notifier, PaymentGatewayError, PaymentIntentService, PaymentLink, StaffDirectory,
    StaffMember, StoreError,
};
