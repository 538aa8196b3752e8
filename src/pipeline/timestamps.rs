//! Event time parsing and loading-time derivation.
//!
//! Unparseable event times are not an error: they become null and the row is
//! kept. Offset-bearing values are normalized to UTC; everything else is
//! taken to already be UTC.

use crate::constants::timestamp_formats;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an event time into a naive UTC timestamp
pub fn parse_event_time(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in timestamp_formats::WITH_OFFSET {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_utc());
        }
    }

    // Trailing Zulu designator on an otherwise naive value
    let naive = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix(" UTC"))
        .unwrap_or(value)
        .trim_end();

    for format in timestamp_formats::NAIVE {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt);
        }
    }

    timestamp_formats::DATE_ONLY
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(naive, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Interpret a naive timestamp as UTC and express it in `zone`
pub fn to_zone(utc: NaiveDateTime, zone: &Tz) -> DateTime<Tz> {
    Utc.from_utc_datetime(&utc).with_timezone(zone)
}
