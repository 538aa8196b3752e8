//! End-to-end processing of one alarm file.
//!
//! Reads and parses the dump, materializes it, runs the normalization
//! pipeline and hands both resulting tables to a sink. Parse and
//! normalization failures abort the run; sink failures are reported per
//! table and do not stop the other write.

use crate::constants::destinations;
use crate::error::Result;
use crate::models::RunSummary;
use crate::parser::parse_alarm_file;
use crate::pipeline::{NormalizationPipeline, NormalizedAlarms};
use crate::pipeline::deduplication::duplicate_metrics;
use crate::sink::{TableSink, write_reported};
use crate::table::AlarmTable;

use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Normalized tables ready to be handed to a sink
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub input_path: PathBuf,
    pub records_parsed: usize,
    pub normalized: NormalizedAlarms,
    started: Instant,
}

/// Runs the alarm loading workflow.
///
/// The work is split in two phases so callers can defer building a sink
/// until the input has been parsed and normalized.
#[derive(Debug, Clone, Default)]
pub struct AlarmProcessor {
    pipeline: NormalizationPipeline,
}

impl AlarmProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the normalization pipeline
    pub fn with_pipeline(mut self, pipeline: NormalizationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Read, parse and normalize one alarm file
    pub fn prepare(&self, path: &Path) -> Result<PreparedRun> {
        let started = Instant::now();
        info!("Processing alarm file {}", path.display());

        let records = parse_alarm_file(Some(path))?;
        debug!("Parsed {} records", records.len());

        let table = AlarmTable::from_records(&records);
        let normalized = self.pipeline.run(&table)?;

        let (percentage, removed) =
            duplicate_metrics(normalized.stats.rows_in, normalized.stats.rows_out);
        info!(
            "Removed {} duplicate rows ({:.1}% of input)",
            removed, percentage
        );

        Ok(PreparedRun {
            input_path: path.to_path_buf(),
            records_parsed: records.len(),
            normalized,
            started,
        })
    }

    /// Write `alarms` then `duplicates`; failures are recorded, not raised
    pub async fn write<S: TableSink>(&self, run: PreparedRun, sink: &S) -> RunSummary {
        let normalized = run.normalized;

        let mut writes = Vec::with_capacity(2);
        writes.push(write_reported(sink, &normalized.alarms, destinations::ALARMS).await);
        writes.push(write_reported(sink, &normalized.duplicates, destinations::DUPLICATES).await);

        let summary = RunSummary {
            input_path: run.input_path,
            records_parsed: run.records_parsed,
            pipeline: normalized.stats,
            writes,
            processing_time_ms: run.started.elapsed().as_millis(),
        };

        if summary.failed_writes() > 0 {
            warn!(
                "{} of {} table writes failed",
                summary.failed_writes(),
                summary.writes.len()
            );
        }

        summary
    }

    /// Prepare one alarm file and write both tables to `sink`
    pub async fn process_file<S: TableSink>(&self, path: &Path, sink: &S) -> Result<RunSummary> {
        let run = self.prepare(path)?;
        Ok(self.write(run, sink).await)
    }
}

/// Print a human-readable summary of a run
pub fn print_summary(summary: &RunSummary) {
    let stats = &summary.pipeline;

    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Input:".bright_cyan(),
        summary.input_path.display()
    );
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Records parsed:".bright_cyan(),
        summary.records_parsed.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Alarms kept:".bright_cyan(),
        stats.rows_out.to_string().bright_white().bold()
    );
    println!(
        "  {} {} rows in {} groups",
        "Duplicates:".bright_cyan(),
        stats.duplicate_rows.to_string().bright_white(),
        stats.duplicate_groups.to_string().bright_white()
    );
    if stats.unparseable_timestamps > 0 {
        println!(
            "  {} {}",
            "Unparseable event times:".bright_yellow(),
            stats.unparseable_timestamps.to_string().bright_yellow()
        );
    }
    if stats.sites_not_found > 0 {
        println!(
            "  {} {}",
            "Sites not found:".bright_yellow(),
            stats.sites_not_found.to_string().bright_yellow()
        );
    }
    if summary.failed_writes() > 0 {
        println!(
            "  {} {}",
            "Failed writes:".bright_red(),
            summary.failed_writes().to_string().bright_red().bold()
        );
    }
}
