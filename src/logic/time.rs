//! `HH:mm` <-> minutes-from-midnight conversion.

use chrono::{NaiveTime, Timelike};

/// 10:00, the opening time used when nothing better is known.
pub const DEFAULT_START_MINUTES: u32 = 10 * 60;

/// Parse a 24-hour `HH:mm` string to minutes since midnight.
pub fn parse_time(time_str: &str) -> Option<u32> {
    let t = NaiveTime::parse_from_str(time_str.trim(), "%H:%M").ok()?;
    Some(t.hour() * 60 + t.minute())
}

/// Parse a fixture start. Unlike [`parse_time`] the hour may run past midnight of the schedule
/// day (`24:15`), which is how [`minutes_to_time`] writes late starts.
pub fn parse_start(time_str: &str) -> Option<u32> {
    if let Some(minutes) = parse_time(time_str) {
        return Some(minutes);
    }
    let (hours, minutes) = time_str.trim().split_once(':')?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if hours.len() < 2 || minutes.len() != 2 || !digits(hours) || !digits(minutes) {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Parse an optional time string, falling back on absence or malformed input.
pub fn time_to_minutes(time_str: Option<&str>, fallback: u32) -> u32 {
    time_str.and_then(parse_time).unwrap_or(fallback)
}

/// Format minutes since midnight as `HH:mm`. Starts past midnight keep counting hours (`24:15`)
/// so they still sort after the rest of the day.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
