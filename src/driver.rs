use async_trait::async_trait;

use crate::error::SqlRowMapError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// The connection layer the mapping executors run on.
///
/// Implementations own their statements and cursors: by the time a call returns, on
/// success or error, the server-side cursor has been released.
#[async_trait]
pub trait QueryDriver: Send + Sync {
    /// Run a parameterized query and collect its column names and rows in cursor order.
    ///
    /// When `max_rows` is set, reading stops once that many rows have been collected.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    async fn select(
        &self,
        query: &str,
        params: &[RowValues],
        max_rows: Option<usize>,
    ) -> Result<ResultSet, SqlRowMapError>;

    /// Run a parameterized statement that returns no rows; yields the affected row count.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    async fn dml(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlRowMapError>;

    /// Run several `;`-separated statements without parameters.
    ///
    /// # Errors
    /// Returns the driver's error unchanged, or `Unimplemented` when the driver has no
    /// batch support.
    async fn execute_batch(&self, sql: &str) -> Result<(), SqlRowMapError> {
        let _ = sql;
        Err(SqlRowMapError::Unimplemented(
            "batch execution is not supported by this driver".to_string(),
        ))
    }
}
