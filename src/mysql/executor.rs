use std::sync::Arc;

use mysql_async::Pool;
use mysql_async::prelude::Queryable;

use crate::error::SqlRowMapError;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::{Params, mysql_value_to_row_value};

/// Execute a SELECT in `MySQL` and materialize up to `max_rows` rows.
///
/// The pending result is drained before the connection goes back to the pool; on early
/// return the connection's drop performs the same cleanup.
///
/// # Errors
/// Returns `SqlRowMapError::MysqlError` if checkout or execution fails.
pub async fn select(
    pool: &Pool,
    query: &str,
    params: &[RowValues],
    max_rows: Option<usize>,
) -> Result<ResultSet, SqlRowMapError> {
    let mut conn = pool.get_conn().await?;
    let driver_params = Params::convert(params).into_driver_params();
    let mut result = conn.exec_iter(query, driver_params).await?;

    let column_names: Vec<String> = result
        .columns_ref()
        .iter()
        .map(|column| column.name_str().into_owned())
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(max_rows.unwrap_or(10).min(10));
    result_set.set_column_names(Arc::new(column_names));

    while let Some(mut row) = result.next().await? {
        let row_values = (0..col_count)
            .map(|idx| {
                row.take::<mysql_async::Value, usize>(idx)
                    .map_or(RowValues::Null, mysql_value_to_row_value)
            })
            .collect();
        result_set.add_row_values(row_values);

        if max_rows.is_some_and(|limit| result_set.len() >= limit) {
            break;
        }
    }
    result.drop_result().await?;

    Ok(result_set)
}

/// Execute a DML statement (INSERT, UPDATE, DELETE) in `MySQL`.
///
/// # Errors
/// Returns `SqlRowMapError::MysqlError` if checkout or execution fails.
pub async fn dml(pool: &Pool, query: &str, params: &[RowValues]) -> Result<usize, SqlRowMapError> {
    let mut conn = pool.get_conn().await?;
    conn.exec_drop(query, Params::convert(params).into_driver_params())
        .await?;
    usize::try_from(conn.affected_rows()).map_err(|e| {
        SqlRowMapError::ExecutionError(format!("affected row count does not fit usize: {e}"))
    })
}

/// Execute a batch of `;`-separated statements in `MySQL` using the text protocol.
///
/// # Errors
/// Returns `SqlRowMapError::MysqlError` if checkout or any statement fails.
pub async fn execute_batch(pool: &Pool, sql: &str) -> Result<(), SqlRowMapError> {
    let mut conn = pool.get_conn().await?;
    conn.query_drop(sql).await?;
    Ok(())
}
