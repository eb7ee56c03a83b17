use async_trait::async_trait;

use crate::driver::QueryDriver;
use crate::error::SqlRowMapError;
use crate::pool::{ConfigAndPool, MiddlewarePool};
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "mysql")]
use crate::mysql;
#[cfg(feature = "sqlite")]
use crate::sqlite;

#[async_trait]
impl QueryDriver for ConfigAndPool {
    async fn select(
        &self,
        query: &str,
        params: &[RowValues],
        max_rows: Option<usize>,
    ) -> Result<ResultSet, SqlRowMapError> {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => sqlite::select(pool, query, params, max_rows).await,
            #[cfg(feature = "mysql")]
            MiddlewarePool::Mysql(pool) => mysql::select(pool, query, params, max_rows).await,
            #[allow(unreachable_patterns)]
            _ => Err(SqlRowMapError::Unimplemented(
                "This database type is not enabled in the current build".to_string(),
            )),
        }
    }

    async fn dml(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlRowMapError> {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => sqlite::dml(pool, query, params).await,
            #[cfg(feature = "mysql")]
            MiddlewarePool::Mysql(pool) => mysql::dml(pool, query, params).await,
            #[allow(unreachable_patterns)]
            _ => Err(SqlRowMapError::Unimplemented(
                "This database type is not enabled in the current build".to_string(),
            )),
        }
    }

    async fn execute_batch(&self, sql: &str) -> Result<(), SqlRowMapError> {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => sqlite::execute_batch(pool, sql).await,
            #[cfg(feature = "mysql")]
            MiddlewarePool::Mysql(pool) => mysql::execute_batch(pool, sql).await,
            #[allow(unreachable_patterns)]
            _ => Err(SqlRowMapError::Unimplemented(
                "This database type is not enabled in the current build".to_string(),
            )),
        }
    }
}
