//! Parquet file sink.
//!
//! Each destination becomes `<output_dir>/<destination>.parquet`. The file is
//! written next to its final location and renamed over it, so an existing
//! destination is replaced whole or not at all.

use crate::error::{AlarmError, Result};
use crate::table::AlarmTable;
use polars::prelude::{DataFrame, ParquetCompression, ParquetWriter};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

use super::TableSink;

/// Writes tables as Snappy-compressed Parquet files
#[derive(Debug, Clone)]
pub struct ParquetSink {
    output_dir: PathBuf,
    compression: ParquetCompression,
}

impl ParquetSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            compression: ParquetCompression::Snappy,
        }
    }

    /// Override the compression codec
    pub fn with_compression(mut self, compression: ParquetCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File a destination is written to
    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.output_dir.join(format!("{}.parquet", destination))
    }
}

impl TableSink for ParquetSink {
    async fn write(&self, table: &AlarmTable, destination: &str) -> Result<usize> {
        let mut df = table.to_dataframe()?;
        let rows = df.height();
        let path = self.path_for(destination);
        let compression = self.compression;

        tokio::fs::create_dir_all(&self.output_dir).await?;

        task::spawn_blocking(move || write_dataframe(&mut df, &path, compression))
            .await
            .map_err(|e| AlarmError::SinkFailed {
                destination: destination.to_string(),
                reason: format!("Parquet writer task failed: {}", e),
            })??;

        debug!(
            "Wrote {} rows to {}",
            rows,
            self.path_for(destination).display()
        );
        Ok(rows)
    }
}

/// Write to a sibling temp file, then rename over `path`
fn write_dataframe(df: &mut DataFrame, path: &Path, compression: ParquetCompression) -> Result<()> {
    let staging = path.with_extension("parquet.tmp");

    let file = std::fs::File::create(&staging)?;
    if let Err(e) = ParquetWriter::new(file)
        .with_compression(compression)
        .finish(df)
    {
        let _ = std::fs::remove_file(&staging);
        return Err(e.into());
    }

    std::fs::rename(&staging, path)?;
    Ok(())
}
