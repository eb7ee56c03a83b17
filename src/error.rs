use thiserror::Error;

#[cfg(feature = "mysql")]
use mysql_async;
#[cfg(feature = "sqlite")]
use rusqlite;

#[derive(Debug, Error)]
pub enum SqlRowMapError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MysqlError(#[from] mysql_async::Error),

    /// The call could not be split into parameters and destinations.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No arguments were supplied to an operation that writes into a destination.
    #[error("Missing destination: the call needs at least one destination argument")]
    MissingDestination,

    #[error("Unsupported destination: {0}")]
    UnsupportedDestination(String),

    /// A single-row fetch found an empty result set.
    #[error("No rows in result set")]
    NoRows,

    /// A column value could not be stored into the slot it was mapped to.
    #[error("Scan failure at column {index} ({column}): {reason}")]
    ScanFailure {
        index: usize,
        column: String,
        reason: String,
    },

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl SqlRowMapError {
    /// True when a single-row fetch matched nothing.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// True when the error came from the database or its driver rather than from row mapping.
    #[must_use]
    pub fn is_execution_failure(&self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            Self::SqliteError(_) => true,
            #[cfg(feature = "mysql")]
            Self::MysqlError(_) => true,
            Self::ExecutionError(_) | Self::ConnectionError(_) => true,
            _ => false,
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<bb8::RunError<rusqlite::Error>> for SqlRowMapError {
    fn from(err: bb8::RunError<rusqlite::Error>) -> Self {
        match err {
            bb8::RunError::User(e) => SqlRowMapError::SqliteError(e),
            bb8::RunError::TimedOut => {
                SqlRowMapError::ConnectionError("SQLite pool checkout timed out".to_string())
            }
        }
    }
}
