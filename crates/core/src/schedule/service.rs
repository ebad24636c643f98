//! Slot generation logic.

use chrono::NaiveTime;

use crate::schedule::error::ScheduleError;
use crate::schedule::types::{Slot, SlotId, WorkingWindow};

/// Stateless service generating a day's bookable slot inventory.
///
/// Generation is deterministic: identical windows always yield identical
/// slot sequences, so previews and regeneration never need persistence.
pub struct SlotGenerator;

impl SlotGenerator {
    /// Generates the ordered slot inventory for a working window.
    ///
    /// The cursor starts at the opening time and steps by the slot
    /// duration while strictly before the closing time. A slot is emitted
    /// only if it fits entirely before closing and does not intersect the
    /// half-open break `[break_start, break_end)`; skipped positions do
    /// not shift later slots. Truncated slots are never emitted.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` if the window invariant is violated. The
    /// window is validated up front, never mid-loop.
    pub fn generate_slots(window: &WorkingWindow) -> Result<Vec<Slot>, ScheduleError> {
        window.validate()?;

        let start = window.start_minute();
        let end = window.end_minute();
        let (break_start, break_end) = window.break_minutes();
        let duration = window.slot_duration_minutes;

        let mut slots = Vec::new();
        let mut cursor = start;
        while cursor < end {
            let slot_end = cursor + duration;
            let fits = slot_end <= end;
            let in_break = window.has_break() && cursor < break_end && slot_end > break_start;
            if fits && !in_break {
                slots.push(Slot {
                    id: SlotId(cursor),
                    start_time: time_from_minute(cursor),
                    duration_minutes: duration,
                });
            }
            cursor += duration;
        }

        Ok(slots)
    }

    /// Returns how many slots a candidate duration would yield.
    ///
    /// Pure re-run of [`Self::generate_slots`] with the duration swapped;
    /// used by the provider configuration UI to preview candidate
    /// durations without persisting anything.
    pub fn preview_slot_count(
        window: &WorkingWindow,
        candidate_duration_minutes: u32,
    ) -> Result<usize, ScheduleError> {
        let candidate = WorkingWindow {
            slot_duration_minutes: candidate_duration_minutes,
            ..*window
        };
        Ok(Self::generate_slots(&candidate)?.len())
    }
}

/// Converts a minute-of-day back into a clock time.
///
/// Cursor values are always < 1440 (bounded by the closing time), so the
/// fallback is unreachable in practice.
fn time_from_minute(minute: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0).unwrap_or(NaiveTime::MIN)
}
