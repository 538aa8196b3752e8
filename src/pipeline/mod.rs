//! Normalization pipeline for parsed alarm records
//!
//! Turns the raw materialized table into the table that gets persisted, plus
//! a snapshot of the exact duplicates that were collapsed along the way.
//!
//! # Architecture
//!
//! - [`timestamps`] - Event time parsing and timezone conversion
//! - [`enrichment`] - Derived `eventTime`, `loading_time` and `site` columns
//! - [`deduplication`] - Full-tuple duplicate snapshot and removal
//!
//! # Processing Pipeline
//!
//! 1. **Projection**: narrow to the required columns (fatal if any is absent)
//! 2. **Timestamps**: parse `eventTime`; unparseable values become null
//! 3. **Loading time**: read `eventTime` as UTC, convert to the target zone
//! 4. **Site**: extract the site code from `NodeName`
//! 5. **Duplicate snapshot**: every row whose tuple occurs more than once
//! 6. **Deduplication**: first occurrence of every distinct tuple
//!
//! # Example Usage
//!
//! ```rust
//! use alarm_loader::parser::parse_alarm_text;
//! use alarm_loader::pipeline::NormalizationPipeline;
//! use alarm_loader::table::AlarmTable;
//!
//! # fn example(text: &str) -> alarm_loader::error::Result<()> {
//! let records = parse_alarm_text(text);
//! let table = AlarmTable::from_records(&records);
//!
//! let output = NormalizationPipeline::default().run(&table)?;
//! println!("{} alarms, {} duplicates", output.alarms.height(), output.duplicates.height());
//! # Ok(())
//! # }
//! ```

pub mod deduplication;
pub mod enrichment;
pub mod timestamps;

#[cfg(test)]
pub mod tests;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::PipelineStats;
use crate::table::AlarmTable;
use tracing::{debug, info};

/// Output of one normalization run
#[derive(Debug, Clone)]
pub struct NormalizedAlarms {
    /// Deduplicated alarm table
    pub alarms: AlarmTable,
    /// Every occurrence of every duplicated tuple, captured before removal
    pub duplicates: AlarmTable,
    pub stats: PipelineStats,
}

/// Projection, enrichment and deduplication over a materialized table
#[derive(Debug, Clone, Default)]
pub struct NormalizationPipeline {
    config: PipelineConfig,
}

impl NormalizationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step in order.
    ///
    /// Only projection can fail; per-row anomalies become null cells and are
    /// counted in the returned stats.
    pub fn run(&self, table: &AlarmTable) -> Result<NormalizedAlarms> {
        let mut stats = PipelineStats {
            rows_in: table.height(),
            ..PipelineStats::default()
        };

        let mut working = table.project(self.config.required_columns.as_slice())?;
        debug!(
            "Projected {} rows onto {} required columns",
            working.height(),
            working.width()
        );

        self.enrich(&mut working, &mut stats)?;

        let duplicates = deduplication::duplicate_snapshot(&working);
        let (_, duplicate_groups, _) = deduplication::analyze_duplicate_patterns(&duplicates);
        stats.duplicate_rows = duplicates.height();
        stats.duplicate_groups = duplicate_groups;

        let alarms = deduplication::remove_duplicates(&working);
        stats.rows_out = alarms.height();

        info!(
            "Normalized {} rows: {} kept, {} in duplicate snapshot, {} unparseable event times, {} without site",
            stats.rows_in,
            stats.rows_out,
            stats.duplicate_rows,
            stats.unparseable_timestamps,
            stats.sites_not_found
        );

        Ok(NormalizedAlarms {
            alarms,
            duplicates,
            stats,
        })
    }

    /// Apply the per-row enrichment steps to an already projected table
    pub fn enrich(&self, table: &mut AlarmTable, stats: &mut PipelineStats) -> Result<()> {
        stats.unparseable_timestamps = enrichment::coerce_event_time(table)?;
        enrichment::add_loading_time(table, &self.config.timezone)?;
        stats.sites_not_found = enrichment::add_site(table)?;
        Ok(())
    }
}
