use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::limit::limit_to_one_row;
use crate::driver::QueryDriver;
use crate::error::SqlRowMapError;
use crate::mapping::{
    Arg, ClassifiedArgs, Destination, DestinationShape, MappingStrategy, Record, RecordSink,
    RecordTarget, ScalarSlot, classify, classify_trailing, detect_shape, map_row, resolve_with,
    scan_failure,
};
use crate::results::ResultSet;
use crate::types::RowValues;

/// A database handle that maps query results into caller-owned destinations.
///
/// Cheap to clone; clones share the underlying driver (and its pool).
///
/// ```rust,no_run
/// use sql_rowmap::prelude::*;
///
/// #[derive(Debug, Default, Clone)]
/// struct User {
///     id: i64,
///     name: String,
///     email: String,
/// }
/// impl_record!(User { id, name, email });
///
/// # async fn demo() -> Result<(), SqlRowMapError> {
/// let cap = ConfigAndPool::sqlite_builder("app.db".into()).build().await?;
/// let db = Database::new(cap);
///
/// let mut user = User::default();
/// db.query_row(
///     "SELECT id, name, email FROM users WHERE email = ?",
///     vec![Arg::from("alice@example.com"), Arg::record(&mut user)],
/// )
/// .await?;
///
/// let everyone: Vec<User> = db.fetch_all("SELECT id, name, email FROM users", &[]).await?;
/// # let _ = everyone;
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct Database {
    driver: Arc<dyn QueryDriver>,
    strategy: MappingStrategy,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("driver", &"<QueryDriver>")
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl Database {
    #[must_use]
    pub fn new(driver: impl QueryDriver + 'static) -> Self {
        Self::from_driver(Arc::new(driver))
    }

    #[must_use]
    pub fn from_driver(driver: Arc<dyn QueryDriver>) -> Self {
        Self {
            driver,
            strategy: MappingStrategy::default(),
        }
    }

    /// Use `strategy` when matching result columns to record fields.
    #[must_use]
    pub fn with_mapping_strategy(mut self, strategy: MappingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn mapping_strategy(&self) -> MappingStrategy {
        self.strategy
    }

    #[must_use]
    pub fn driver(&self) -> &Arc<dyn QueryDriver> {
        &self.driver
    }

    /// Fetch one row into the destinations found in `args`.
    ///
    /// Leading parameters are bound to the query; the first destination starts the
    /// destination run. Scalar destinations are filled by position. A single record
    /// destination is filled by column name, and the query gets `LIMIT 1` appended when it
    /// has no limit of its own.
    ///
    /// # Errors
    /// - [`SqlRowMapError::MissingDestination`] / [`SqlRowMapError::InvalidArguments`] for a
    ///   malformed call.
    /// - [`SqlRowMapError::UnsupportedDestination`] for a record sequence or a mixed run.
    /// - [`SqlRowMapError::NoRows`] when nothing matched.
    /// - [`SqlRowMapError::ScanFailure`] when a value does not fit its destination.
    /// - Driver errors, unchanged.
    pub async fn query_row(&self, query: &str, args: Vec<Arg<'_>>) -> Result<(), SqlRowMapError> {
        let ClassifiedArgs { params, dests } = classify(args)?;
        self.fetch_one_into(query, &params, dests).await
    }

    /// Fetch every row, appending one record per row to the last argument.
    ///
    /// All other arguments are query parameters.
    ///
    /// # Errors
    /// - [`SqlRowMapError::MissingDestination`] / [`SqlRowMapError::InvalidArguments`] for a
    ///   malformed call.
    /// - [`SqlRowMapError::UnsupportedDestination`] unless the destination is a record sequence.
    /// - [`SqlRowMapError::ScanFailure`] at the first row that fails; records appended before
    ///   it stay in the destination.
    /// - Driver errors, unchanged.
    pub async fn query(&self, query: &str, args: Vec<Arg<'_>>) -> Result<(), SqlRowMapError> {
        let (params, dest) = classify_trailing(args)?;
        match dest {
            Destination::Records(sink) => self.fetch_all_into(query, &params, sink).await.map(drop),
            other => Err(SqlRowMapError::UnsupportedDestination(format!(
                "multi-row queries need a record sequence destination, got a {}",
                other.kind()
            ))),
        }
    }

    /// Fetch one row into an explicit destination run.
    ///
    /// # Errors
    /// Same as [`Database::query_row`], minus argument classification.
    pub async fn fetch_one_into(
        &self,
        query: &str,
        params: &[RowValues],
        dests: Vec<Destination<'_>>,
    ) -> Result<(), SqlRowMapError> {
        match detect_shape(dests)? {
            DestinationShape::ScalarList(slots) => self.scan_scalars(query, params, slots).await,
            DestinationShape::SingleRecord(target) => {
                self.fetch_record(query, params, target).await
            }
            DestinationShape::RecordSequence(_) => Err(SqlRowMapError::UnsupportedDestination(
                "single-row queries need scalar or record destinations, got a record sequence"
                    .to_string(),
            )),
        }
    }

    /// Fetch the first row as a `T`.
    ///
    /// # Errors
    /// [`SqlRowMapError::NoRows`] when nothing matched, [`SqlRowMapError::ScanFailure`] on
    /// conversion failure, or the driver's error.
    pub async fn fetch_one<T: Record>(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<T, SqlRowMapError> {
        let mut record = T::default();
        self.fetch_record(query, params, &mut record).await?;
        Ok(record)
    }

    /// Fetch every row as a `T`, in cursor order.
    ///
    /// # Errors
    /// [`SqlRowMapError::ScanFailure`] on conversion failure, or the driver's error.
    pub async fn fetch_all<T: Record>(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Vec<T>, SqlRowMapError> {
        let mut records = Vec::new();
        self.fetch_all_into(query, params, &mut records).await?;
        Ok(records)
    }

    /// Append one record per row to `sink`; returns the number of rows appended.
    ///
    /// # Errors
    /// [`SqlRowMapError::ScanFailure`] at the first failing row (earlier rows remain in
    /// `sink`), or the driver's error.
    pub async fn fetch_all_into(
        &self,
        query: &str,
        params: &[RowValues],
        sink: &mut dyn RecordSink,
    ) -> Result<usize, SqlRowMapError> {
        let result = self.driver.select(query, params, None).await?;
        let (columns, rows) = result.into_parts();
        let plan = resolve_with(self.strategy, &columns, sink.record_descriptor());

        let mut appended = 0;
        for row in rows {
            sink.append_from(&plan, &columns, row)?;
            appended += 1;
        }
        trace!(
            record = sink.record_descriptor().type_name(),
            rows = appended,
            "mapped result rows"
        );
        Ok(appended)
    }

    /// Run the query and return the raw result set.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub async fn select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlRowMapError> {
        self.driver.select(query, params, None).await
    }

    /// Execute a statement that returns no rows; yields the affected row count.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub async fn exec(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlRowMapError> {
        self.driver.dml(query, params).await
    }

    /// Execute a statement bounded to one row, appending `LIMIT 1` when the statement has
    /// no limit of its own.
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub async fn exec_one(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlRowMapError> {
        let bounded = limit_to_one_row(query);
        self.driver.dml(&bounded, params).await
    }

    /// Run several `;`-separated statements without parameters (schema setup, seeding).
    ///
    /// # Errors
    /// Returns the driver's error unchanged.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SqlRowMapError> {
        self.driver.execute_batch(sql).await
    }

    async fn scan_scalars(
        &self,
        query: &str,
        params: &[RowValues],
        slots: Vec<&mut dyn ScalarSlot>,
    ) -> Result<(), SqlRowMapError> {
        let result = self.driver.select(query, params, Some(1)).await?;
        let (columns, rows) = result.into_parts();
        let row = rows.into_iter().next().ok_or(SqlRowMapError::NoRows)?;

        if row.len() != slots.len() {
            return Err(SqlRowMapError::InvalidArguments(format!(
                "expected {} destination arguments, got {}",
                row.len(),
                slots.len()
            )));
        }
        for (index, (slot, value)) in slots.into_iter().zip(row).enumerate() {
            slot.scan(value)
                .map_err(|reason| scan_failure(index, &columns, reason))?;
        }
        Ok(())
    }

    async fn fetch_record(
        &self,
        query: &str,
        params: &[RowValues],
        target: &mut dyn RecordTarget,
    ) -> Result<(), SqlRowMapError> {
        let bounded = limit_to_one_row(query);
        if matches!(bounded, Cow::Owned(_)) {
            debug!(query = %bounded, "appended row limit to single-record query");
        }
        let result = self.driver.select(&bounded, params, Some(1)).await?;
        let (columns, rows) = result.into_parts();
        let row = rows.into_iter().next().ok_or(SqlRowMapError::NoRows)?;

        let plan = resolve_with(self.strategy, &columns, target.record_descriptor());
        target.map_from(&plan, &columns, row)
    }
}

/// Map an already materialized result set into a fresh vector of `T`.
///
/// # Errors
/// [`SqlRowMapError::ScanFailure`] at the first failing row.
pub fn map_result_set<T: Record>(
    result: ResultSet,
    strategy: MappingStrategy,
) -> Result<Vec<T>, SqlRowMapError> {
    let (columns, rows) = result.into_parts();
    let plan = resolve_with(strategy, &columns, T::descriptor());
    rows.into_iter()
        .map(|row| map_row::<T>(&plan, &columns, row))
        .collect()
}
