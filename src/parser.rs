//! Alarm log parsing.
//!
//! The alarm dump has no header row and no fixed column layout: every alarm
//! is a block of `Key: Value` lines, blocks are separated by blank lines, and
//! a line without a colon continues the value of the previous key. This
//! module folds those lines into [`FieldRecord`]s.

use crate::constants::{BYTE_ORDER_MARK, DEFAULT_ALARM_FILE};
use crate::error::{AlarmError, Result};
use crate::models::{FieldRecord, RecordCollection};
use std::path::Path;
use tracing::debug;

/// Line-by-line state machine that accumulates alarm records
#[derive(Debug, Default)]
pub struct FieldAccumulator {
    current: FieldRecord,
    last_key: Option<String>,
    records: RecordCollection,
}

impl FieldAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next raw line
    pub fn consume(&mut self, line: &str) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.flush();
            return;
        }

        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_string();
            self.current.insert(key.clone(), value.trim());
            self.last_key = Some(key);
            return;
        }

        // Continuation line; dropped when no key is open in this record
        if let Some(value) = self
            .last_key
            .as_deref()
            .and_then(|key| self.current.get_mut(key))
        {
            value.push('\n');
            value.push_str(trimmed);
        }
    }

    /// Close the open record, if any, and return everything collected
    pub fn finish(mut self) -> RecordCollection {
        self.flush();
        self.records
    }

    /// Records completed so far
    pub fn completed(&self) -> usize {
        self.records.len()
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.records.push(std::mem::take(&mut self.current));
        }
        self.last_key = None;
    }
}

/// Parse a sequence of lines into alarm records
pub fn parse_lines<'a, I>(lines: I) -> RecordCollection
where
    I: IntoIterator<Item = &'a str>,
{
    let mut accumulator = FieldAccumulator::new();
    for line in lines {
        accumulator.consume(line);
    }
    accumulator.finish()
}

/// Parse a complete alarm dump held in memory
pub fn parse_alarm_text(text: &str) -> RecordCollection {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    parse_lines(text.lines())
}

/// Read an alarm dump from disk, stripping a leading byte-order mark
pub fn read_alarm_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AlarmError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", text.len(), path.display());

    Ok(match text.strip_prefix(BYTE_ORDER_MARK) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Read and parse an alarm file, defaulting to `alarms.txt`
pub fn parse_alarm_file(path: Option<&Path>) -> Result<RecordCollection> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_ALARM_FILE));
    let text = read_alarm_file(path)?;
    let records = parse_alarm_text(&text);

    debug!(
        "Parsed {} alarm records from {}",
        records.len(),
        path.display()
    );

    Ok(records)
}
