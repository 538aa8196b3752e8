//! Core data structures for alarm loading.
//!
//! Defines the reconstructed alarm record, the statistics gathered while
//! normalizing, and the per-destination outcome of a run.

use serde::Serialize;
use std::path::PathBuf;

/// One reconstructed alarm event as key/value text pairs.
///
/// Keys are unique and iterate in first-seen order. Overwriting a key keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    fields: Vec<(String, String)>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = FieldRecord::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Ordered alarm records, one per event, as they appeared in the source text
pub type RecordCollection = Vec<FieldRecord>;

/// Statistics gathered by the normalization pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub rows_in: usize,
    pub unparseable_timestamps: usize,
    pub sites_not_found: usize,
    /// Rows captured in the duplicate snapshot (all occurrences)
    pub duplicate_rows: usize,
    /// Distinct tuples that occur more than once
    pub duplicate_groups: usize,
    pub rows_out: usize,
}

/// Result of handing one table to a sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WriteOutcome {
    Written { destination: String, rows: usize },
    Failed { destination: String, reason: String },
}

impl WriteOutcome {
    pub fn destination(&self) -> &str {
        match self {
            WriteOutcome::Written { destination, .. } | WriteOutcome::Failed { destination, .. } => {
                destination
            }
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }
}

/// Summary of processing one alarm file
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub records_parsed: usize,
    pub pipeline: PipelineStats,
    pub writes: Vec<WriteOutcome>,
    pub processing_time_ms: u128,
}

impl RunSummary {
    pub fn failed_writes(&self) -> usize {
        self.writes.iter().filter(|w| !w.is_written()).count()
    }
}
