use std::sync::Arc;

use bb8::Pool;

use crate::error::SqlRowMapError;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::config::{SharedSqliteConnection, SqliteManager};
use super::params::Params;
use super::query::build_result_set;

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlRowMapError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlRowMapError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlRowMapError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

/// Execute a SELECT in `SQLite` and materialize up to `max_rows` rows.
///
/// # Errors
/// Returns `SqlRowMapError` if checkout, preparing, or executing the query fails.
pub async fn select(
    pool: &Pool<SqliteManager>,
    query: &str,
    params: &[RowValues],
    max_rows: Option<usize>,
) -> Result<ResultSet, SqlRowMapError> {
    let conn = pool.get().await?;
    let sql_owned = query.to_owned();
    let params_owned = Params::convert(params);
    run_blocking(Arc::clone(&*conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned)?;
        build_result_set(&mut stmt, params_owned.as_values(), max_rows)
    })
    .await
}

/// Execute a DML statement (INSERT, UPDATE, DELETE) in `SQLite`.
///
/// # Errors
/// Returns `SqlRowMapError` if checkout, preparing, or executing the statement fails.
pub async fn dml(
    pool: &Pool<SqliteManager>,
    query: &str,
    params: &[RowValues],
) -> Result<usize, SqlRowMapError> {
    let conn = pool.get().await?;
    let sql_owned = query.to_owned();
    let params_owned = Params::convert(params);
    run_blocking(Arc::clone(&*conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned)?;
        let rows = stmt.execute(rusqlite::params_from_iter(params_owned.as_values().iter()))?;
        Ok(rows)
    })
    .await
}

/// Execute a batch of SQL statements in `SQLite` using auto-commit.
///
/// # Errors
/// Returns `SqlRowMapError` if checkout or any statement fails.
pub async fn execute_batch(pool: &Pool<SqliteManager>, sql: &str) -> Result<(), SqlRowMapError> {
    let conn = pool.get().await?;
    let sql_owned = sql.to_owned();
    run_blocking(Arc::clone(&*conn), move |guard| {
        guard
            .execute_batch(&sql_owned)
            .map_err(SqlRowMapError::SqliteError)
    })
    .await
}
