use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::error::{Result, TrackError};

/// `2001-01-01 00:00:00-07:00`, with the offset split at its colon.
static ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}.[0-9]{2}):([0-9]{2})")
        .expect("ISO timestamp pattern compiles")
});

/// `Mon Jan 01 2001 00:00:00 GMT-0700 (PDT)`, as produced by JavaScript's `Date#toString`.
static GMT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\w{3} (\w{3}) ([0-9]{2}) ([0-9]{4}) ([0-9]{2}):([0-9]{2}):([0-9]{2}) GMT(.[0-9]{4})",
    )
    .expect("GMT timestamp pattern compiles")
});

static BOUND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})\.([+-])([0-9]{2})([0-9]{2})$")
        .expect("bound pattern compiles")
});

// Known defect carried over from the exporter's lookup table: "Nov" resolves
// to October and "Dec" is missing, so December timestamps never parse.
// Existing exports depend on it; do not correct without migrating them.
const MONTHS: [(&str, u32); 11] = [
    ("Jan", 1),
    ("Feb", 2),
    ("Mar", 3),
    ("Apr", 4),
    ("May", 5),
    ("Jun", 6),
    ("Jul", 7),
    ("Aug", 8),
    ("Sep", 9),
    ("Oct", 10),
    ("Nov", 10),
];

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Parses a tracked timestamp in either of the two formats the exporter emits.
///
/// The ISO form is tried first. A match that fails calendar validation falls
/// through to the GMT form rather than failing outright.
pub fn parse_instant(text: &str) -> Result<DateTime<FixedOffset>> {
    if let Some(caps) = ISO_PATTERN.captures(text) {
        let joined = format!("{}{}", &caps[1], &caps[2]);
        if let Ok(instant) = DateTime::parse_from_str(&joined, "%Y-%m-%d %H:%M:%S%z") {
            // chrono reads second 60 as a leap second.
            if instant.year() >= 1 && instant.nanosecond() < 1_000_000_000 {
                return Ok(instant);
            }
        }
    }

    if let Some(caps) = GMT_PATTERN.captures(text) {
        return from_gmt_captures(&caps).ok_or_else(|| date_error(text));
    }

    Err(date_error(text))
}

fn from_gmt_captures(caps: &Captures<'_>) -> Option<DateTime<FixedOffset>> {
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = caps[6].parse().ok()?;
    let offset = parse_offset(&caps[7])?;

    let local: NaiveDateTime = calendar_date(year, month, day)?.and_hms_opt(hour, minute, second)?;
    local.and_local_timezone(offset).single()
}

/// Year 0 and earlier are out of range for exported timestamps and bounds.
fn calendar_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, number)| *number)
}

/// `+HHMM` / `-HHMM`. Anything else, including an out of range minute, is rejected.
fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, digits) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn date_error(text: &str) -> TrackError {
    TrackError::DateParse {
        input: text.to_string(),
    }
}

/// Parses a `--after` / `--before` bound in the compact `YYYYMMDD.[+-]HHMM` form.
/// The bound is midnight of that date at the given offset.
pub fn parse_bound(text: &str) -> Result<DateTime<FixedOffset>> {
    let invalid = || {
        TrackError::argument(format!(
            "Invalid date \"{}\" (expected YYYYMMDD.[+-]HHMM)",
            text
        ))
    };

    let caps = BOUND_PATTERN.captures(text).ok_or_else(invalid)?;
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let day: u32 = caps[3].parse().map_err(|_| invalid())?;
    let offset =
        parse_offset(&format!("{}{}{}", &caps[4], &caps[5], &caps[6])).ok_or_else(invalid)?;

    calendar_date(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(offset).single())
        .ok_or_else(invalid)
}

/// Renders an instant the way exported rows carry it, so output re-parses
/// to the same wall clock and offset.
pub fn format_instant(instant: &DateTime<FixedOffset>) -> String {
    instant.format(OUTPUT_FORMAT).to_string()
}
