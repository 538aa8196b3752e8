//! Derived columns for the alarm table.
//!
//! Parses `eventTime` in place, derives `loading_time` from it, and derives
//! `site` from `NodeName`. Rows that cannot be enriched get null cells.

use crate::constants::columns;
use crate::error::{AlarmError, Result};
use crate::site::get_site;
use crate::table::{AlarmTable, ColumnValues};
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use tracing::debug;

use super::timestamps::{parse_event_time, to_zone};

/// Replace the text `eventTime` column with parsed timestamps.
///
/// Returns the number of present values that failed to parse. Cells for
/// records that lacked the field are already null and are not counted.
pub fn coerce_event_time(table: &mut AlarmTable) -> Result<usize> {
    let (parsed, failures) = match table.column(columns::EVENT_TIME) {
        Some(ColumnValues::Text(values)) => {
            let parsed: Vec<Option<NaiveDateTime>> = values
                .iter()
                .map(|v| v.as_deref().and_then(parse_event_time))
                .collect();
            let failures = values
                .iter()
                .zip(&parsed)
                .filter(|(raw, ts)| raw.is_some() && ts.is_none())
                .count();
            (parsed, failures)
        }
        Some(ColumnValues::Timestamp(_)) => return Ok(0),
        _ => return Err(missing(columns::EVENT_TIME)),
    };

    if failures > 0 {
        debug!("{} event times could not be parsed and were set to null", failures);
    }

    table.set_column(columns::EVENT_TIME, ColumnValues::Timestamp(parsed))?;
    Ok(failures)
}

/// Add `loading_time`: each parsed event time, read as UTC, in `zone`
pub fn add_loading_time(table: &mut AlarmTable, zone: &Tz) -> Result<()> {
    let event_times = table
        .column(columns::EVENT_TIME)
        .and_then(ColumnValues::as_timestamps)
        .ok_or_else(|| missing(columns::EVENT_TIME))?;

    let loading: Vec<Option<DateTime<Tz>>> = event_times
        .iter()
        .map(|ts| ts.map(|ts| to_zone(ts, zone)))
        .collect();

    table.set_column(columns::LOADING_TIME, ColumnValues::Zoned(loading))
}

/// Add `site` extracted from `NodeName`, returning how many rows had none
pub fn add_site(table: &mut AlarmTable) -> Result<usize> {
    let node_names = table
        .column(columns::NODE_NAME)
        .and_then(ColumnValues::as_text)
        .ok_or_else(|| missing(columns::NODE_NAME))?;

    let sites: Vec<Option<String>> = node_names
        .iter()
        .map(|name| name.as_deref().and_then(get_site).map(str::to_string))
        .collect();

    let not_found = sites.iter().filter(|s| s.is_none()).count();
    table.set_column(columns::SITE, ColumnValues::Text(sites))?;
    Ok(not_found)
}

fn missing(column: &str) -> AlarmError {
    AlarmError::MissingColumns {
        columns: vec![column.to_string()],
    }
}
