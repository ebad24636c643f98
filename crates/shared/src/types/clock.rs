//! Clock-time helpers for `HH:MM` working-hours fields.
//!
//! Provider working hours are configured as 24h `HH:MM` strings; slot
//! arithmetic happens in minutes since midnight.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// Error parsing an `HH:MM` clock time.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid clock time {input:?}, expected HH:MM (24h)")]
pub struct ClockTimeError {
    /// The rejected input.
    pub input: String,
}

/// Parses a 24h `HH:MM` string into a [`NaiveTime`].
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, ClockTimeError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| ClockTimeError {
        input: s.to_string(),
    })
}

/// Returns the minute-of-day (0..=1439) for a clock time.
///
/// Seconds are discarded; working-hours fields are whole-minute times.
#[must_use]
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("09:00", 9 * 60)]
    #[case("00:00", 0)]
    #[case("23:59", 23 * 60 + 59)]
    #[case("13:30", 13 * 60 + 30)]
    fn test_parse_and_minute_of_day(#[case] input: &str, #[case] expected: u32) {
        let time = parse_hhmm(input).unwrap();
        assert_eq!(minute_of_day(time), expected);
    }

    #[rstest]
    #[case("9am")]
    #[case("25:00")]
    #[case("12:60")]
    #[case("")]
    fn test_parse_rejects_bad_input(#[case] input: &str) {
        assert!(parse_hhmm(input).is_err());
    }
}
