//! Helper utilities for testing code built on the mapping layer.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::driver::QueryDriver;
use crate::error::SqlRowMapError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// One call seen by a [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedCall {
    pub query: String,
    pub params: Vec<RowValues>,
    pub max_rows: Option<usize>,
}

/// An in-process [`QueryDriver`] that serves a canned result and records every call.
///
/// `select` returns the configured columns and rows (honoring `max_rows`), `dml` reports
/// the configured row count as affected.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    columns: Vec<String>,
    rows: Vec<Vec<RowValues>>,
    failure: Option<String>,
    calls: Mutex<Vec<ObservedCall>>,
}

impl RecordingDriver {
    #[must_use]
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<RowValues>>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
            ..Self::default()
        }
    }

    /// A driver whose queries return no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A driver whose every call fails with `ExecutionError(message)`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<ObservedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// SQL text of every call, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.query).collect()
    }

    fn record(
        &self,
        query: &str,
        params: &[RowValues],
        max_rows: Option<usize>,
    ) -> Result<(), SqlRowMapError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ObservedCall {
                query: query.to_string(),
                params: params.to_vec(),
                max_rows,
            });
        match &self.failure {
            Some(message) => Err(SqlRowMapError::ExecutionError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueryDriver for RecordingDriver {
    async fn select(
        &self,
        query: &str,
        params: &[RowValues],
        max_rows: Option<usize>,
    ) -> Result<ResultSet, SqlRowMapError> {
        self.record(query, params, max_rows)?;

        let take = max_rows.unwrap_or(self.rows.len());
        let mut result_set = ResultSet::with_capacity(take.min(self.rows.len()));
        result_set.set_column_names(Arc::new(self.columns.clone()));
        for row in self.rows.iter().take(take) {
            result_set.add_row_values(row.clone());
        }
        Ok(result_set)
    }

    async fn dml(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlRowMapError> {
        self.record(query, params, None)?;
        Ok(self.rows.len())
    }

    async fn execute_batch(&self, sql: &str) -> Result<(), SqlRowMapError> {
        self.record(sql, &[], None)
    }
}
