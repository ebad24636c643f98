//! Working window and slot types.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use fixora_shared::types::{minute_of_day, parse_hhmm};

use crate::schedule::error::ScheduleError;

/// A provider's daily working window.
///
/// All times are whole-minute 24h clock times. The break is optional in the
/// degenerate form `break_start == break_end`, which means "no break".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    /// Opening time.
    pub start_time: NaiveTime,
    /// Closing time.
    pub end_time: NaiveTime,
    /// Break start.
    pub break_start: NaiveTime,
    /// Break end.
    pub break_end: NaiveTime,
    /// Length of each bookable slot, in minutes.
    pub slot_duration_minutes: u32,
}

impl WorkingWindow {
    /// Builds a window from `HH:MM` strings.
    pub fn from_hhmm(
        start: &str,
        end: &str,
        break_start: &str,
        break_end: &str,
        slot_duration_minutes: u32,
    ) -> Result<Self, ScheduleError> {
        let window = Self {
            start_time: parse_hhmm(start)?,
            end_time: parse_hhmm(end)?,
            break_start: parse_hhmm(break_start)?,
            break_end: parse_hhmm(break_end)?,
            slot_duration_minutes,
        };
        window.validate()?;
        Ok(window)
    }

    /// Returns true if the window has a non-degenerate break.
    #[must_use]
    pub fn has_break(&self) -> bool {
        self.break_start != self.break_end
    }

    /// Validates the window invariant.
    ///
    /// Required: `start < end`, duration > 0, and for a non-degenerate
    /// break `start < break_start < break_end < end`.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.slot_duration_minutes == 0 {
            return Err(ScheduleError::ZeroSlotDuration);
        }
        if self.start_time >= self.end_time {
            return Err(ScheduleError::WindowOutOfOrder {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.has_break() {
            if self.break_start > self.break_end {
                return Err(ScheduleError::BreakOutOfOrder {
                    break_start: self.break_start,
                    break_end: self.break_end,
                });
            }
            if self.break_start <= self.start_time || self.break_end >= self.end_time {
                return Err(ScheduleError::BreakOutsideWindow {
                    start: self.start_time,
                    end: self.end_time,
                    break_start: self.break_start,
                    break_end: self.break_end,
                });
            }
        }
        Ok(())
    }

    /// Opening time as minute-of-day.
    #[must_use]
    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.start_time)
    }

    /// Closing time as minute-of-day.
    #[must_use]
    pub fn end_minute(&self) -> u32 {
        minute_of_day(self.end_time)
    }

    /// Break bounds as minute-of-day.
    #[must_use]
    pub fn break_minutes(&self) -> (u32, u32) {
        (minute_of_day(self.break_start), minute_of_day(self.break_end))
    }
}

/// Identifier of a slot within a day.
///
/// Deterministic: the slot's start minute-of-day. Regenerating the same
/// window reproduces identical IDs, so slots need no persisted identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// A fixed-duration bookable time window on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Deterministic slot identifier.
    pub id: SlotId,
    /// Slot start time.
    pub start_time: NaiveTime,
    /// Slot length in minutes.
    pub duration_minutes: u32,
}
