//! Tests for derived column enrichment

use super::*;
use crate::constants::REQUIRED_COLUMNS;
use crate::error::AlarmError;
use crate::models::FieldRecord;
use crate::pipeline::enrichment::{add_loading_time, add_site, coerce_event_time};
use crate::table::ColumnValues;
use chrono::NaiveDate;

fn projected(records: &[FieldRecord]) -> AlarmTable {
    table_of(records).project(REQUIRED_COLUMNS.as_slice()).unwrap()
}

#[test]
fn test_coerce_event_time_parses_and_counts_failures() {
    let mut table = projected(&[
        create_alarm("1A", "2024-01-01T00:00:00Z", "1"),
        create_alarm("1A", "garbage", "2"),
        create_alarm("1A", "2024-06-01 12:00:00", "3"),
    ]);

    let failures = coerce_event_time(&mut table).unwrap();
    assert_eq!(failures, 1);

    let times = table.column("eventTime").unwrap().as_timestamps().unwrap();
    assert_eq!(
        times[0],
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0)
    );
    assert_eq!(times[1], None);
    assert!(times[2].is_some());
    assert_eq!(table.height(), 3);
}

#[test]
fn test_coerce_event_time_is_idempotent() {
    let mut table = projected(&[create_alarm("1A", "bad", "1")]);

    assert_eq!(coerce_event_time(&mut table).unwrap(), 1);
    assert_eq!(coerce_event_time(&mut table).unwrap(), 0);
    assert!(matches!(
        table.column("eventTime"),
        Some(ColumnValues::Timestamp(_))
    ));
}

#[test]
fn test_absent_event_time_is_not_a_failure() {
    let full = create_alarm("1A", "2024-01-01 00:00:00", "1");
    let partial = without_field(&create_alarm("1A", "x", "2"), "eventTime");

    let mut table = projected(&[full, partial]);
    assert_eq!(coerce_event_time(&mut table).unwrap(), 0);
}

#[test]
fn test_loading_time_follows_event_time() {
    let mut table = projected(&[
        create_alarm("1A", "2024-01-01T00:00:00Z", "1"),
        create_alarm("1A", "not a time", "2"),
    ]);
    coerce_event_time(&mut table).unwrap();
    add_loading_time(&mut table, &chrono_tz::America::New_York).unwrap();

    let loading = table.column("loading_time").unwrap().as_zoned().unwrap();
    assert_eq!(
        loading[0].as_ref().map(|ts| ts.to_rfc3339()),
        Some("2023-12-31T19:00:00-05:00".to_string())
    );
    assert!(loading[1].is_none());
}

#[test]
fn test_loading_time_requires_parsed_event_time() {
    let mut table = projected(&[create_alarm("1A", "2024-01-01T00:00:00Z", "1")]);

    let result = add_loading_time(&mut table, &chrono_tz::America::New_York);
    assert!(matches!(result, Err(AlarmError::MissingColumns { .. })));
}

#[test]
fn test_site_column_and_not_found_count() {
    let mut table = projected(&[
        create_alarm("RBS12KNX", "2024-01-01T00:00:00Z", "1"),
        create_alarm("NoDigitsHere", "2024-01-01T00:00:00Z", "2"),
        create_alarm("12345", "2024-01-01T00:00:00Z", "3"),
    ]);

    let not_found = add_site(&mut table).unwrap();
    assert_eq!(not_found, 2);
    assert_eq!(table.text("site", 0), Some("12KNX"));
    assert_eq!(table.text("site", 1), None);
    assert_eq!(table.text("site", 2), None);
}

#[test]
fn test_site_is_null_for_missing_node_name() {
    let without_node = without_field(
        &create_alarm("ignored", "2024-01-01T00:00:00Z", "2"),
        "NodeName",
    );
    let mut table = projected(&[
        create_alarm("7X", "2024-01-01T00:00:00Z", "1"),
        without_node,
    ]);

    assert_eq!(add_site(&mut table).unwrap(), 1);
    assert_eq!(table.text("site", 0), Some("7X"));
    assert_eq!(table.text("site", 1), None);
}
