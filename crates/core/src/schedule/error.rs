//! Schedule error types.

use chrono::NaiveTime;
use thiserror::Error;

use fixora_shared::types::clock::ClockTimeError;

/// Errors raised while validating a working window or generating slots.
///
/// Every variant is a configuration problem: the window must be corrected
/// by the provider before slots can be generated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// A working-hours field is not a valid `HH:MM` time.
    #[error("Invalid clock time: {0}")]
    InvalidTime(#[from] ClockTimeError),

    /// The window closes before (or when) it opens.
    #[error("Working window must open before it closes ({start}..{end})")]
    WindowOutOfOrder {
        /// Opening time.
        start: NaiveTime,
        /// Closing time.
        end: NaiveTime,
    },

    /// The break ends before it starts.
    #[error("Break must start before it ends ({break_start}..{break_end})")]
    BreakOutOfOrder {
        /// Break start.
        break_start: NaiveTime,
        /// Break end.
        break_end: NaiveTime,
    },

    /// The break does not fall strictly inside the working window.
    #[error(
        "Break {break_start}..{break_end} must fall strictly inside working hours {start}..{end}"
    )]
    BreakOutsideWindow {
        /// Opening time.
        start: NaiveTime,
        /// Closing time.
        end: NaiveTime,
        /// Break start.
        break_start: NaiveTime,
        /// Break end.
        break_end: NaiveTime,
    },

    /// Slot duration must be positive.
    #[error("Slot duration must be greater than zero")]
    ZeroSlotDuration,
}

impl ScheduleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "CONFIGURATION_ERROR"
    }
}
