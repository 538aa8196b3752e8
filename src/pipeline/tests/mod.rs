//! Test module for the normalization pipeline
//!
//! Shared builders for alarm records and tables used by the submodules.

pub mod enrichment_tests;

use crate::constants::REQUIRED_COLUMNS;
use crate::models::FieldRecord;
use crate::table::AlarmTable;

/// Create a record carrying every required field
pub fn create_alarm(node_name: &str, event_time: &str, alarm_id: &str) -> FieldRecord {
    [
        ("NodeName", node_name),
        ("specificProblem", "Link Failure"),
        ("eventTime", event_time),
        ("problemText", "link down"),
        ("alarmState", "ACTIVE_UNACKNOWLEDGED"),
        ("alarmId", alarm_id),
        ("probableCause", "LinkDown"),
        ("eventType", "COMMUNICATIONS_ALARM"),
    ]
    .into_iter()
    .collect()
}

/// Create a record with every required field plus extra fields the
/// projection must discard
pub fn create_alarm_with_extras(node_name: &str, event_time: &str, alarm_id: &str) -> FieldRecord {
    let mut record = create_alarm(node_name, event_time, alarm_id);
    record.insert("objectOfReference", "SubNetwork=ONRM_ROOT,MeContext=RBS1");
    record.insert("recordType", "ALARM");
    record
}

/// Copy of `record` without `field`
pub fn without_field(record: &FieldRecord, field: &str) -> FieldRecord {
    record.iter().filter(|(key, _)| *key != field).collect()
}

/// Materialize records into a table
pub fn table_of(records: &[FieldRecord]) -> AlarmTable {
    AlarmTable::from_records(records)
}

/// Names of the columns expected after normalization
pub fn normalized_columns() -> Vec<&'static str> {
    let mut columns: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    columns.push("loading_time");
    columns.push("site");
    columns
}
