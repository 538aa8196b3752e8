//! Tabular materialization of alarm records.
//!
//! An [`AlarmTable`] is an ordered mapping of column name to a typed column
//! of optional values, plus the positional id every row was given when the
//! table was built from the record collection. Filtering keeps those ids so
//! that surviving rows can still be traced back to their source position.

use crate::constants::columns;
use crate::error::{AlarmError, Result};
use crate::models::FieldRecord;
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series, TimeUnit};
use tracing::debug;

/// Values of a single column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Text(Vec<Option<String>>),
    /// Naive timestamps holding UTC wall-clock time
    Timestamp(Vec<Option<NaiveDateTime>>),
    /// Timestamps localized to a named zone
    Zoned(Vec<Option<DateTime<Tz>>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Timestamp(v) => v.len(),
            ColumnValues::Zoned(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            ColumnValues::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamps(&self) -> Option<&[Option<NaiveDateTime>]> {
        match self {
            ColumnValues::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_zoned(&self) -> Option<&[Option<DateTime<Tz>>]> {
        match self {
            ColumnValues::Zoned(v) => Some(v),
            _ => None,
        }
    }

    /// Borrowed view of one cell
    pub fn cell(&self, row: usize) -> Cell<'_> {
        match self {
            ColumnValues::Text(v) => v[row].as_deref().map_or(Cell::Null, Cell::Text),
            ColumnValues::Timestamp(v) => v[row].map_or(Cell::Null, Cell::Timestamp),
            ColumnValues::Zoned(v) => v[row]
                .as_ref()
                .map_or(Cell::Null, |dt| Cell::Instant(dt.naive_utc())),
        }
    }

    fn take(&self, rows: &[usize]) -> ColumnValues {
        match self {
            ColumnValues::Text(v) => ColumnValues::Text(rows.iter().map(|&i| v[i].clone()).collect()),
            ColumnValues::Timestamp(v) => ColumnValues::Timestamp(rows.iter().map(|&i| v[i]).collect()),
            ColumnValues::Zoned(v) => {
                ColumnValues::Zoned(rows.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// Hashable view of a cell, used to compare whole rows.
///
/// Zoned values compare by instant, matching how equal timestamps in the
/// same zone compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell<'a> {
    Null,
    Text(&'a str),
    Timestamp(NaiveDateTime),
    Instant(NaiveDateTime),
}

/// Alarm records as explicit typed columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmTable {
    columns: Vec<(String, ColumnValues)>,
    row_ids: Vec<usize>,
}

impl AlarmTable {
    /// Materialize records into text columns.
    ///
    /// Columns are the union of every key observed, in first-seen order.
    /// A record lacking a key gets a null cell in that column.
    pub fn from_records(records: &[FieldRecord]) -> Self {
        let mut names: Vec<&str> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !names.contains(&key) {
                    names.push(key);
                }
            }
        }

        let columns = names
            .iter()
            .map(|&name| {
                let values = records
                    .iter()
                    .map(|record| record.get(name).map(str::to_string))
                    .collect();
                (name.to_string(), ColumnValues::Text(values))
            })
            .collect();

        debug!(
            "Materialized {} records into {} columns",
            records.len(),
            names.len()
        );

        Self {
            columns,
            row_ids: (0..records.len()).collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.row_ids.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Positional ids assigned at materialization, in current row order
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnValues)> {
        self.columns.iter().map(|(name, values)| (name.as_str(), values))
    }

    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Convenience accessor for a text cell
    pub fn text(&self, column: &str, row: usize) -> Option<&str> {
        self.column(column)
            .and_then(ColumnValues::as_text)
            .and_then(|values| values[row].as_deref())
    }

    /// Insert a column, replacing any existing column of the same name in
    /// place, otherwise appending it.
    pub fn set_column(&mut self, name: impl Into<String>, values: ColumnValues) -> Result<()> {
        let name = name.into();
        if values.len() != self.height() {
            return Err(AlarmError::Configuration {
                message: format!(
                    "Column '{}' has {} values but the table has {} rows",
                    name,
                    values.len(),
                    self.height()
                ),
            });
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(())
    }

    /// Narrow the table to exactly `required`, in that order.
    ///
    /// Fails listing every required column that never appeared.
    pub fn project<S: AsRef<str>>(&self, required: &[S]) -> Result<AlarmTable> {
        let missing: Vec<String> = required
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !self.has_column(name))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(AlarmError::MissingColumns { columns: missing });
        }

        let columns = required
            .iter()
            .map(|name| name.as_ref())
            .filter_map(|name| {
                self.column(name)
                    .map(|values| (name.to_string(), values.clone()))
            })
            .collect();

        Ok(AlarmTable {
            columns,
            row_ids: self.row_ids.clone(),
        })
    }

    /// Full tuple of one row across every column
    pub fn row(&self, row: usize) -> Vec<Cell<'_>> {
        self.columns
            .iter()
            .map(|(_, values)| values.cell(row))
            .collect()
    }

    /// New table holding only the given rows, in the given order
    pub fn take_rows(&self, rows: &[usize]) -> AlarmTable {
        AlarmTable {
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values.take(rows)))
                .collect(),
            row_ids: rows.iter().map(|&i| self.row_ids[i]).collect(),
        }
    }

    /// Convert to a polars DataFrame with a leading `id` column.
    ///
    /// Naive timestamps become `Datetime(us)`. Zoned timestamps are written
    /// as RFC 3339 text so the offset survives.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let ids: Vec<u64> = self.row_ids.iter().map(|&id| id as u64).collect();
        let mut frame_columns: Vec<Column> = Vec::with_capacity(self.width() + 1);
        frame_columns.push(Series::new(columns::ID.into(), ids).into());

        for (name, values) in &self.columns {
            let series = match values {
                ColumnValues::Text(v) => Series::new(name.as_str().into(), v),
                ColumnValues::Timestamp(v) => {
                    let micros: Vec<Option<i64>> = v
                        .iter()
                        .map(|ts| ts.map(|ts| ts.and_utc().timestamp_micros()))
                        .collect();
                    Series::new(name.as_str().into(), micros)
                        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
                }
                ColumnValues::Zoned(v) => {
                    let text: Vec<Option<String>> =
                        v.iter().map(|ts| ts.as_ref().map(|ts| ts.to_rfc3339())).collect();
                    Series::new(name.as_str().into(), text)
                }
            };
            frame_columns.push(series.into());
        }

        Ok(DataFrame::new(frame_columns)?)
    }
}
