//! Wall-clock time codec.
//!
//! The solver works exclusively in minutes from midnight. This module
//! converts between that representation and the `HH:MM:SS` strings used on
//! the wire. ISO datetimes are accepted on input; the time portion is the
//! last `T`-delimited segment.

use anyhow::{bail, Result};

/// Parse a time-of-day string into minutes from midnight.
///
/// Accepts `HH:MM:SS`, `HH:MM`, and ISO datetimes such as
/// `2023-10-01T12:30:00`. Seconds are validated but discarded.
pub fn parse_minutes(value: &str) -> Result<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("invalid time format: empty string");
    }

    // For datetimes the time of day is the last 'T'-delimited segment.
    let time_part = match trimmed.rsplit_once('T') {
        Some((_, time)) => time,
        None => trimmed,
    };

    let parts: Vec<&str> = time_part.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        bail!("invalid time format: {value}");
    }

    let hours: i32 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid time format: {value}"))?;
    let minutes: i32 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid time format: {value}"))?;
    let seconds: i32 = match parts.get(2) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid time format: {value}"))?,
        None => 0,
    };

    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        bail!("time out of range: {value}");
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes from midnight as a zero-padded `HH:MM:SS` string.
/// Seconds are always `00`.
pub fn format_minutes(minutes: i32) -> String {
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

/// Parse an optional deadline string into minutes from midnight.
///
/// The literal `"None"` (any casing) and the empty string mean no deadline.
/// Both time-only and datetime shapes are accepted.
pub fn parse_deadline(value: &str) -> Result<Option<i32>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_minutes(trimmed).map(Some)
}
