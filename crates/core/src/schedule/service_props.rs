//! Property-based tests for SlotGenerator.

use chrono::NaiveTime;
use proptest::prelude::*;

use crate::schedule::service::SlotGenerator;
use crate::schedule::types::WorkingWindow;

fn time(minute: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0).unwrap()
}

/// Strategy for generating valid working windows, with and without breaks.
fn arb_window() -> impl Strategy<Value = WorkingWindow> {
    // start < break_start < break_end < end, all within a day
    (0u32..600, 1u32..120, 1u32..240, 1u32..240, 1u32..180).prop_map(
        |(start, pre, brk, post, duration)| WorkingWindow {
            start_time: time(start),
            break_start: time(start + pre),
            break_end: time(start + pre + brk),
            end_time: time(start + pre + brk + post),
            slot_duration_minutes: duration,
        },
    )
}

fn arb_breakless_window() -> impl Strategy<Value = WorkingWindow> {
    (0u32..600, 1u32..600, 1u32..180).prop_map(|(start, span, duration)| WorkingWindow {
        start_time: time(start),
        break_start: time(start),
        break_end: time(start),
        end_time: time(start + span),
        slot_duration_minutes: duration,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Identical windows always yield identical sequences.
    #[test]
    fn prop_generation_is_deterministic(window in arb_window()) {
        let first = SlotGenerator::generate_slots(&window).unwrap();
        let second = SlotGenerator::generate_slots(&window).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Start times increase monotonically on the duration grid.
    #[test]
    fn prop_slot_starts_monotonic(window in arb_window()) {
        let slots = SlotGenerator::generate_slots(&window).unwrap();
        for pair in slots.windows(2) {
            prop_assert!(pair[0].id.0 < pair[1].id.0);
            prop_assert_eq!(
                (pair[1].id.0 - pair[0].id.0) % window.slot_duration_minutes, 0,
                "slots stay on the duration grid"
            );
        }
    }

    /// No slot intersects the half-open break window.
    #[test]
    fn prop_no_slot_overlaps_break(window in arb_window()) {
        let (break_start, break_end) = window.break_minutes();
        let slots = SlotGenerator::generate_slots(&window).unwrap();
        for slot in &slots {
            let slot_start = slot.id.0;
            let slot_end = slot_start + slot.duration_minutes;
            prop_assert!(
                slot_end <= break_start || slot_start >= break_end,
                "slot {}..{} overlaps break {}..{}",
                slot_start, slot_end, break_start, break_end
            );
        }
    }

    /// Every emitted slot fits entirely inside working hours.
    #[test]
    fn prop_slots_fit_window(window in arb_window()) {
        let slots = SlotGenerator::generate_slots(&window).unwrap();
        for slot in &slots {
            prop_assert!(slot.id.0 >= window.start_minute());
            prop_assert!(slot.id.0 + slot.duration_minutes <= window.end_minute());
        }
    }

    /// A degenerate break filters nothing: slot count equals the number of
    /// grid positions that fit the span.
    #[test]
    fn prop_breakless_window_is_dense(window in arb_breakless_window()) {
        let slots = SlotGenerator::generate_slots(&window).unwrap();
        let span = window.end_minute() - window.start_minute();
        let expected = (span / window.slot_duration_minutes) as usize;
        prop_assert_eq!(slots.len(), expected);
    }

    /// Preview agrees with full generation for any candidate duration.
    #[test]
    fn prop_preview_matches_generation(window in arb_window(), candidate in 1u32..180) {
        let preview = SlotGenerator::preview_slot_count(&window, candidate).unwrap();
        let full = SlotGenerator::generate_slots(&WorkingWindow {
            slot_duration_minutes: candidate,
            ..window
        })
        .unwrap();
        prop_assert_eq!(preview, full.len());
    }
}
