//! Elapsed and remaining time formatting.
//!
//! Durations render condensed as `XhYmZs`: the hour component is omitted
//! when zero, the minute component only when hour and minute are both zero;
//! seconds always show. Refreshing once per second is a presentation
//! concern and lives with the caller.

use chrono::{DateTime, Utc};

/// Fixed sentinel reported when an estimated duration has run out.
pub const EXCEEDED: &str = "Excedido";

/// Whole seconds between `start` and `now`, clamped at zero.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_seconds().max(0)
}

/// Formats a second count as condensed `XhYmZs`.
pub fn format_duration(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h "));
    }
    if minutes > 0 || hours > 0 {
        out.push_str(&format!("{minutes}m "));
    }
    out.push_str(&format!("{seconds}s"));
    out
}

/// Formats the time elapsed since `start`.
pub fn format_elapsed(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_duration(elapsed_seconds(start, now))
}

/// Seconds left of an estimate given in minutes, never negative.
pub fn remaining_seconds(estimated_minutes: u32, elapsed_seconds: i64) -> i64 {
    (i64::from(estimated_minutes) * 60 - elapsed_seconds).max(0)
}

/// Formats the time left of an estimate; reports [`EXCEEDED`] instead of
/// `0s` once the estimate has run out.
pub fn format_remaining(start: DateTime<Utc>, now: DateTime<Utc>, estimated_minutes: u32) -> String {
    let remaining = remaining_seconds(estimated_minutes, elapsed_seconds(start, now));
    if remaining > 0 {
        format_duration(remaining)
    } else {
        EXCEEDED.to_string()
    }
}
