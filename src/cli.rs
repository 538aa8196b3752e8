//! Command-line interface components.

use crate::config::ConnectionConfig;
use crate::constants::{DEFAULT_ALARM_FILE, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_SECTION};
use crate::error::Result;
use crate::models::RunSummary;
use crate::processor::AlarmProcessor;
use crate::sink::{AnySink, ParquetSink, PostgresSink};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(name = "alarm_loader")]
#[command(about = "Parse a network alarm dump, remove exact duplicates and load the result")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Alarm dump to load
    #[arg(value_name = "FILE", default_value = DEFAULT_ALARM_FILE)]
    pub file: PathBuf,

    /// INI file holding the PostgreSQL connection parameters
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Section of the INI file to read
    #[arg(short, long, default_value = DEFAULT_CONFIG_SECTION)]
    pub section: String,

    /// Write Parquet files to this directory instead of PostgreSQL
    #[arg(long, value_name = "DIR")]
    pub parquet_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Sink selected by the flags. The connection file is only read in
    /// PostgreSQL mode; the pool must be built inside a tokio runtime.
    pub fn build_sink(&self) -> Result<AnySink> {
        match &self.parquet_dir {
            Some(dir) => {
                info!("Writing Parquet output to {}", dir.display());
                Ok(AnySink::Parquet(ParquetSink::new(dir)))
            }
            None => {
                let connection = ConnectionConfig::load(&self.config, &self.section)?;
                info!(
                    "Writing to PostgreSQL database {} on {}:{}",
                    connection.dbname, connection.host, connection.port
                );
                Ok(AnySink::Postgres(PostgresSink::connect_lazy(&connection)))
            }
        }
    }
}

/// Load one alarm file end to end.
///
/// The sink is built only after the input has parsed and normalized, so a
/// missing column is reported ahead of a bad connection file.
pub async fn run(args: &Args) -> Result<RunSummary> {
    let processor = AlarmProcessor::new();
    let prepared = processor.prepare(&args.file)?;
    let sink = args.build_sink()?;
    Ok(processor.write(prepared, &sink).await)
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("alarm_loader={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}
