//! Constants shared across the alarm loading pipeline.

/// Input file read when no path is given on the command line
pub const DEFAULT_ALARM_FILE: &str = "alarms.txt";

/// Connection settings file and section used by the PostgreSQL sink
pub const DEFAULT_CONFIG_FILE: &str = "db.ini";
pub const DEFAULT_CONFIG_SECTION: &str = "postgresql";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Columns every alarm table is projected onto, in output order
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "NodeName",
    "specificProblem",
    "eventTime",
    "problemText",
    "alarmState",
    "alarmId",
    "probableCause",
    "eventType",
];

pub mod columns {
    pub const NODE_NAME: &str = "NodeName";
    pub const EVENT_TIME: &str = "eventTime";
    pub const LOADING_TIME: &str = "loading_time";
    pub const SITE: &str = "site";
    pub const ID: &str = "id";
}

pub mod destinations {
    pub const ALARMS: &str = "alarms";
    pub const DUPLICATES: &str = "duplicates";
}

/// Zone loading times are reported in
pub const LOADING_TIMEZONE: chrono_tz::Tz = chrono_tz::America::New_York;

/// Byte-order mark some exporters prefix to the alarm dump
pub const BYTE_ORDER_MARK: char = '\u{feff}';

pub mod timestamp_formats {
    /// Formats carrying an explicit UTC offset
    pub const WITH_OFFSET: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f %z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
    ];

    /// Formats without an offset; values are taken to be UTC
    pub const NAIVE: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%a %b %e %H:%M:%S %Y",
    ];

    /// Bare dates, taken as midnight UTC
    pub const DATE_ONLY: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
}

pub mod postgres {
    /// Rows per INSERT statement; keeps bind parameters well under the
    /// protocol limit of 65535 for the widest alarm table.
    pub const INSERT_CHUNK_ROWS: usize = 1000;

    pub const ACQUIRE_TIMEOUT_SECS: u64 = 10;
}
