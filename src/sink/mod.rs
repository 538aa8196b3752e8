//! Persistence sinks for normalized alarm tables.
//!
//! A sink receives a finished [`AlarmTable`] and a destination name and
//! replaces whatever the destination held before. The row position assigned
//! at materialization is written as an explicit `id` column.

pub mod parquet;
pub mod postgres;

use crate::error::Result;
use crate::models::WriteOutcome;
use crate::table::AlarmTable;
use std::future::Future;
use tracing::{error, info};

pub use self::parquet::ParquetSink;
pub use self::postgres::PostgresSink;

/// Destination for finished tables
pub trait TableSink {
    /// Replace `destination` with `table`, returning the rows written
    fn write(
        &self,
        table: &AlarmTable,
        destination: &str,
    ) -> impl Future<Output = Result<usize>> + Send;
}

/// Write a table and report the outcome instead of propagating failure
pub async fn write_reported<S: TableSink>(
    sink: &S,
    table: &AlarmTable,
    destination: &str,
) -> WriteOutcome {
    match sink.write(table, destination).await {
        Ok(rows) => {
            info!("Wrote {} rows to {}", rows, destination);
            println!("Data written to {} successfully.", destination);
            WriteOutcome::Written {
                destination: destination.to_string(),
                rows,
            }
        }
        Err(e) => {
            error!("Failed to write {}: {:#}", destination, e);
            println!("Error writing data to {}: {}", destination, e);
            WriteOutcome::Failed {
                destination: destination.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Either supported sink, chosen at runtime
#[derive(Debug)]
pub enum AnySink {
    Parquet(ParquetSink),
    Postgres(PostgresSink),
}

impl TableSink for AnySink {
    async fn write(&self, table: &AlarmTable, destination: &str) -> Result<usize> {
        match self {
            AnySink::Parquet(sink) => sink.write(table, destination).await,
            AnySink::Postgres(sink) => sink.write(table, destination).await,
        }
    }
}
