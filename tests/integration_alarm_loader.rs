//! Integration tests for the alarm loading workflow
//!
//! These tests drive a complete run from an alarm dump on disk through
//! parsing, normalization and persistence, using the Parquet sink and an
//! in-memory sink that can be told to fail.

use alarm_loader::constants::destinations;
use alarm_loader::processor::AlarmProcessor;
use alarm_loader::sink::{ParquetSink, TableSink};
use alarm_loader::table::AlarmTable;
use alarm_loader::{AlarmError, Result, WriteOutcome};
use polars::prelude::{ParquetReader, SerReader};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};

/// Two identical alarms followed by a distinct one on another node
const ALARM_DUMP: &str = "\
NodeName: RBS12KNX
specificProblem: Link Failure
eventTime: 2024-01-15 10:30:00
problemText: link down on port 3
carrier lost
alarmState: ACTIVE_UNACKNOWLEDGED
alarmId: 1001
probableCause: LossOfSignal
eventType: COMMUNICATIONS_ALARM
recordType: ALARM

NodeName: RBS12KNX
specificProblem: Link Failure
eventTime: 2024-01-15 10:30:00
problemText: link down on port 3
carrier lost
alarmState: ACTIVE_UNACKNOWLEDGED
alarmId: 1001
probableCause: LossOfSignal
eventType: COMMUNICATIONS_ALARM
recordType: ALARM

NodeName: CoreSwitch
specificProblem: Fan Failure
eventTime: 2024-07-04T18:00:00Z
problemText: fan 2 stopped
alarmState: CLEARED
alarmId: 1002
probableCause: EquipmentMalfunction
eventType: EQUIPMENT_ALARM
";

fn write_dump(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn read_parquet(path: &Path) -> polars::prelude::DataFrame {
    let file = std::fs::File::open(path).unwrap();
    ParquetReader::new(file).finish().unwrap()
}

/// Records every write and fails the destinations it is told to
#[derive(Default)]
struct RecordingSink {
    fail_on: Vec<&'static str>,
    attempts: Mutex<Vec<(String, usize)>>,
}

impl TableSink for RecordingSink {
    async fn write(&self, table: &AlarmTable, destination: &str) -> Result<usize> {
        self.attempts
            .lock()
            .unwrap()
            .push((destination.to_string(), table.height()));

        if self.fail_on.iter().any(|failing| *failing == destination) {
            return Err(AlarmError::SinkFailed {
                destination: destination.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(table.height())
    }
}

#[tokio::test]
async fn test_end_to_end_parquet_output() {
    let input = write_dump(ALARM_DUMP);
    let output_dir = TempDir::new().unwrap();
    let sink = ParquetSink::new(output_dir.path());

    let summary = AlarmProcessor::new()
        .process_file(input.path(), &sink)
        .await
        .unwrap();

    assert_eq!(summary.records_parsed, 3);
    assert_eq!(summary.pipeline.rows_out, 2);
    assert_eq!(summary.pipeline.duplicate_rows, 2);
    assert_eq!(summary.pipeline.sites_not_found, 1);
    assert_eq!(summary.failed_writes(), 0);

    let alarms = read_parquet(&sink.path_for(destinations::ALARMS));
    assert_eq!(alarms.height(), 2);
    assert_eq!(
        alarms.get_column_names_str(),
        vec![
            "id",
            "NodeName",
            "specificProblem",
            "eventTime",
            "problemText",
            "alarmState",
            "alarmId",
            "probableCause",
            "eventType",
            "loading_time",
            "site",
        ]
    );

    // The kept rows retain their original positions
    let ids = alarms.column("id").unwrap().as_materialized_series();
    assert_eq!(ids.u64().unwrap().get(0), Some(0));
    assert_eq!(ids.u64().unwrap().get(1), Some(2));

    let problem = alarms.column("problemText").unwrap().as_materialized_series();
    assert_eq!(
        problem.str().unwrap().get(0),
        Some("link down on port 3\ncarrier lost")
    );

    let loading = alarms.column("loading_time").unwrap().as_materialized_series();
    assert_eq!(
        loading.str().unwrap().get(1),
        Some("2024-07-04T14:00:00-04:00")
    );

    let duplicates = read_parquet(&sink.path_for(destinations::DUPLICATES));
    assert_eq!(duplicates.height(), 2);
}

#[tokio::test]
async fn test_failed_alarms_write_still_writes_duplicates() {
    let input = write_dump(ALARM_DUMP);
    let sink = RecordingSink {
        fail_on: vec![destinations::ALARMS],
        ..RecordingSink::default()
    };

    let summary = AlarmProcessor::new()
        .process_file(input.path(), &sink)
        .await
        .unwrap();

    let attempts = sink.attempts.lock().unwrap().clone();
    assert_eq!(
        attempts,
        vec![
            (destinations::ALARMS.to_string(), 2),
            (destinations::DUPLICATES.to_string(), 2),
        ]
    );

    assert_eq!(summary.failed_writes(), 1);
    assert!(matches!(
        &summary.writes[0],
        WriteOutcome::Failed { destination, .. } if destination == destinations::ALARMS
    ));
    assert_eq!(
        summary.writes[1],
        WriteOutcome::Written {
            destination: destinations::DUPLICATES.to_string(),
            rows: 2,
        }
    );
}

#[tokio::test]
async fn test_missing_required_column_writes_nothing() {
    let dump = ALARM_DUMP
        .lines()
        .filter(|line| !line.starts_with("probableCause"))
        .collect::<Vec<_>>()
        .join("\n");
    let input = write_dump(&dump);

    let sink = RecordingSink::default();
    let result = AlarmProcessor::new().process_file(input.path(), &sink).await;

    match result {
        Err(AlarmError::MissingColumns { columns }) => {
            assert_eq!(columns, vec!["probableCause".to_string()]);
        }
        other => panic!("Expected MissingColumns error, got {:?}", other),
    }
    assert!(sink.attempts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::default();

    let result = AlarmProcessor::new()
        .process_file(&dir.path().join("absent.txt"), &sink)
        .await;
    assert!(matches!(result, Err(AlarmError::InputNotFound { .. })));
    assert!(sink.attempts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dump_without_duplicates_writes_empty_snapshot() {
    let dump: String = ALARM_DUMP.split("\n\n").skip(1).collect::<Vec<_>>().join("\n\n");
    let input = write_dump(&dump);

    let sink = RecordingSink::default();
    let summary = AlarmProcessor::new()
        .process_file(input.path(), &sink)
        .await
        .unwrap();

    assert_eq!(summary.records_parsed, 2);
    assert_eq!(summary.pipeline.duplicate_rows, 0);
    assert_eq!(
        summary.writes[1],
        WriteOutcome::Written {
            destination: destinations::DUPLICATES.to_string(),
            rows: 0,
        }
    );
}
