//! Arrival time formatting.
//!
//! The backend reports prediction times as `"<date> <H:MM>"` on a 24-hour
//! clock. Riders see them as 12-hour times with an AM/PM suffix. The minute
//! text is shown exactly as received; only the hour is converted.

use chrono::{NaiveTime, Timelike};

/// Error returned when a prediction timestamp has no usable clock time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid arrival time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse the trailing `H:MM` clock of a timestamp.
///
/// Returns the validated time together with the minute text as it appeared
/// in the input.
fn parse_clock(timestamp: &str) -> Result<(NaiveTime, &str), TimeError> {
    let clock = timestamp
        .split_whitespace()
        .last()
        .ok_or_else(|| TimeError::new("empty timestamp"))?;

    let (hour_text, minute_text) = clock
        .split_once(':')
        .ok_or_else(|| TimeError::new("expected H:MM"))?;

    let hour = parse_digits(hour_text).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    let minute =
        parse_digits(minute_text).ok_or_else(|| TimeError::new("invalid minute digits"))?;

    let time =
        NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("out of range"))?;

    Ok((time, minute_text))
}

/// Parse one or two ASCII digits.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Convert a `"<date> <H:MM>"` timestamp to 12-hour clock text.
///
/// # Examples
///
/// ```
/// use bus_tracker::domain::to_twelve_hour;
///
/// assert_eq!(to_twelve_hour("12/25 13:30").unwrap(), "1:30 PM");
/// assert_eq!(to_twelve_hour("12/25 0:05").unwrap(), "12:05 AM");
/// assert!(to_twelve_hour("12/25 25:00").is_err());
/// ```
pub fn to_twelve_hour(timestamp: &str) -> Result<String, TimeError> {
    let (time, minute_text) = parse_clock(timestamp)?;
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    Ok(format!("{hour}:{minute_text} {suffix}"))
}

/// Rider-facing arrival time. Falls back to the raw text when the
/// timestamp cannot be read.
pub fn format_arrival_time(timestamp: &str) -> String {
    to_twelve_hour(timestamp).unwrap_or_else(|_| timestamp.to_string())
}
