//! Date/time helpers for presenting API timestamps to people.
//!
//! APIs hand back ISO 8601 strings; the UI shows them as
//! `M/D/YYYY H:MM AM|PM` in the viewer's time zone. Accepted inputs:
//!   - **With offset**: `2023-01-05T14:30:00Z`, `2023-01-05T14:30+02:00`
//!     (converted into the target zone)
//!   - **Naive date-time**: `2023-01-05T14:30:00`, `2023-01-05 14:30`
//!     (taken as wall-clock time in the target zone; a time skipped by a
//!     DST jump is moved forward by an hour)
//!   - **Date-only**: `2023-01-05` (UTC midnight, then converted)
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;
use thiserror::Error;

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y %-I:%M %p";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// RFC 3339 covers offsets with seconds; these add the minute-precision forms.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ISO 8601 timestamp: '{input}'")]
pub struct InvalidTimestamp {
    pub input: String,
}

/// Format an ISO 8601 timestamp in the local time zone.
pub fn format_timestamp(iso: &str) -> Result<String, InvalidTimestamp> {
    format_timestamp_in(iso, &Local)
}

/// Format an ISO 8601 timestamp in `tz`.
pub fn format_timestamp_in<Tz>(iso: &str, tz: &Tz) -> Result<String, InvalidTimestamp>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    parse_in(iso, tz)
        .map(|dt| format_date_time(&dt))
        .ok_or_else(|| InvalidTimestamp {
            input: iso.to_string(),
        })
}

/// `M/D/YYYY H:MM AM|PM`: no padding except on minutes, hours 0 and 12 show as 12.
pub fn format_date_time<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format(DISPLAY_FORMAT).to_string()
}

fn parse_in<Tz: TimeZone>(iso: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let s = iso.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz));
    }

    if let Some(utc) = s.strip_suffix(['Z', 'z']) {
        let naive = parse_naive(utc)?;
        return Some(Utc.from_utc_datetime(&naive).with_timezone(tz));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(tz));
        }
    }

    if let Some(naive) = parse_naive(s) {
        return tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest());
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    Some(midnight.with_timezone(tz))
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}
