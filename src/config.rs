//! Configuration for normalization and persistence.
//!
//! [`PipelineConfig`] carries the column projection and target timezone used
//! by the normalization pipeline. [`ConnectionConfig`] holds the PostgreSQL
//! connection parameters read from one section of an INI file.

use crate::constants::{
    BYTE_ORDER_MARK, DEFAULT_POSTGRES_PORT, LOADING_TIMEZONE, REQUIRED_COLUMNS,
};
use crate::error::{AlarmError, Result};
use chrono_tz::Tz;
use ini::{Ini, ParseOption};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Parameters of the normalization pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Columns the table is projected onto, in output order
    pub required_columns: Vec<String>,

    /// Zone `loading_time` is expressed in
    pub timezone: Tz,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            required_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            timezone: LOADING_TIMEZONE,
        }
    }
}

impl PipelineConfig {
    /// Replace the projected column list
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the loading-time zone
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

/// PostgreSQL connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl ConnectionConfig {
    /// Load connection parameters from `section` of the INI file at `path`.
    ///
    /// A missing file is reported the same way as a missing section.
    pub fn load(path: &Path, section: &str) -> Result<Self> {
        if !path.exists() {
            return Err(AlarmError::MissingSection {
                section: section.to_string(),
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let contents = contents.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&contents);

        // Values are taken verbatim: no quote stripping, no backslash escapes
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(contents, options)?;

        let properties = ini
            .section(Some(section))
            .ok_or_else(|| AlarmError::MissingSection {
                section: section.to_string(),
                path: path.to_path_buf(),
            })?;

        let params: HashMap<String, String> = properties
            .iter()
            .map(|(key, value)| (key.to_lowercase(), value.to_string()))
            .collect();

        debug!(
            "Loaded {} connection parameters from section [{}] of {}",
            params.len(),
            section,
            path.display()
        );

        Self::from_params(&params, section)
    }

    /// Build from a flat key/value map (keys lower-cased)
    pub fn from_params(params: &HashMap<String, String>, section: &str) -> Result<Self> {
        let required = |key: &str| {
            params
                .get(key)
                .cloned()
                .ok_or_else(|| AlarmError::Configuration {
                    message: format!("Missing '{}' in section [{}]", key, section),
                })
        };

        let port = match params.get("port").map(|p| p.trim()) {
            None | Some("") => DEFAULT_POSTGRES_PORT,
            Some(raw) => raw.parse::<u16>().map_err(|e| AlarmError::Configuration {
                message: format!("Invalid port '{}' in section [{}]: {}", raw, section, e),
            })?,
        };

        Ok(Self {
            host: required("host")?,
            port,
            user: required("user")?,
            password: required("password")?,
            dbname: required("dbname")?,
        })
    }
}
