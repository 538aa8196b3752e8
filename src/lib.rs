//! Alarm Loader Library
//!
//! Loads network alarm dumps into a database. A dump is a headerless text
//! file of `key: value` lines, one block per alarm, with values that may
//! continue over several lines.
//!
//! This library provides tools for:
//! - Accumulating dump lines into ordered field records
//! - Materializing records into a typed table with stable row ids
//! - Normalizing event times and deriving `loading_time` and `site`
//! - Snapshotting and removing exact duplicate rows
//! - Writing the `alarms` and `duplicates` tables to PostgreSQL or Parquet

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod processor;
pub mod sink;
pub mod site;
pub mod table;

// Re-export commonly used types
pub use config::{ConnectionConfig, PipelineConfig};
pub use error::{AlarmError, Result};
pub use models::{FieldRecord, PipelineStats, RecordCollection, RunSummary, WriteOutcome};
pub use pipeline::{NormalizationPipeline, NormalizedAlarms};
pub use processor::AlarmProcessor;
pub use site::get_site;
pub use table::AlarmTable;
