//! Error handling for alarm loading operations.
//!
//! Fatal conditions (unreadable input, missing required columns, bad
//! connection configuration, sink failures) are represented here. Recoverable
//! per-row anomalies never become errors; they surface as null cells.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration file error: {0}")]
    Ini(#[from] ini::ParseError),

    #[error("Alarm file not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Required columns not found in any record: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Section {section} not found in the {} file", path.display())]
    MissingSection { section: String, path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Write to {destination} failed: {reason}")]
    SinkFailed { destination: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AlarmError>;
