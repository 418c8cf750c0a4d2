//! Error types for configuration and schedule loading

use thiserror::Error;

/// Configuration validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Configuration error: the roster has no people")]
    EmptyRoster,

    #[error("Configuration error: person '{0}' is listed more than once")]
    DuplicatePerson(String),

    #[error("Configuration error: person code '{0}' must contain only ASCII letters")]
    InvalidPersonCode(String),

    #[error("Configuration error: no shift columns configured")]
    NoShiftColumns,

    #[error("Configuration error: column '{0}' is configured more than once")]
    DuplicateColumn(String),

    #[error("Configuration error: date_column_prefix must not be empty")]
    EmptyDatePrefix,
}

/// Failures turning a workbook into a schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Could not find a sheet with a {prefix} column.")]
    NoDateSheet { prefix: String },

    #[error("Sheet '{0}' has a date column but no dated rows")]
    EmptySheet(String),
}
