//! PostgreSQL sink.
//!
//! Every write drops and recreates the destination table and loads the rows
//! in chunked multi-row INSERTs, all inside one transaction. A failed write
//! leaves the previous table in place.

use crate::config::ConnectionConfig;
use crate::constants::columns;
use crate::constants::postgres::{ACQUIRE_TIMEOUT_SECS, INSERT_CHUNK_ROWS};
use crate::error::Result;
use crate::table::{AlarmTable, ColumnValues};
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use std::time::Duration;
use tracing::debug;

use super::TableSink;

#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    /// Build a sink whose pool connects on first use.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(config: &ConnectionConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.dbname);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect_lazy_with(options);

        Self { pool }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TableSink for PostgresSink {
    async fn write(&self, table: &AlarmTable, destination: &str) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&drop_table_sql(destination))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&create_table_sql(table, destination))
            .execute(&mut *tx)
            .await?;

        let rows: Vec<usize> = (0..table.height()).collect();
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = insert_builder(table, destination, chunk);
            builder.build().execute(&mut *tx).await?;
            debug!("Inserted {} rows into {}", chunk.len(), destination);
        }

        tx.commit().await?;
        Ok(table.height())
    }
}

/// Quote an identifier, doubling embedded quotes
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(values: &ColumnValues) -> &'static str {
    match values {
        ColumnValues::Text(_) => "TEXT",
        ColumnValues::Timestamp(_) => "TIMESTAMP",
        ColumnValues::Zoned(_) => "TIMESTAMPTZ",
    }
}

fn drop_table_sql(destination: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(destination))
}

fn create_table_sql(table: &AlarmTable, destination: &str) -> String {
    let mut definitions = vec![format!("{} BIGINT PRIMARY KEY", quote_ident(columns::ID))];
    definitions.extend(
        table
            .columns()
            .map(|(name, values)| format!("{} {}", quote_ident(name), sql_type(values))),
    );
    format!(
        "CREATE TABLE {} ({})",
        quote_ident(destination),
        definitions.join(", ")
    )
}

fn column_list(table: &AlarmTable) -> String {
    std::iter::once(columns::ID)
        .chain(table.column_names())
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_builder(
    table: &AlarmTable,
    destination: &str,
    rows: &[usize],
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        quote_ident(destination),
        column_list(table)
    ));

    builder.push_values(rows.iter().copied(), |mut b, row| {
        b.push_bind(table.row_ids()[row] as i64);
        for (_, values) in table.columns() {
            match values {
                ColumnValues::Text(v) => {
                    b.push_bind(v[row].clone());
                }
                ColumnValues::Timestamp(v) => {
                    b.push_bind(v[row]);
                }
                ColumnValues::Zoned(v) => {
                    b.push_bind(v[row].as_ref().map(|ts| ts.with_timezone(&Utc)));
                }
            }
        }
    });

    builder
}
