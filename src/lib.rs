//! Map SQL result rows into caller-owned destinations.
//!
//! A [`Database`] runs queries through a [`QueryDriver`] (a pooled `SQLite` or `MySQL`
//! connection, or anything else implementing the trait) and writes the rows it gets back
//! into scalar slots, a single record, or a vector of records. Records describe their
//! fields with [`impl_record!`]; columns are matched to fields by alias, then by name,
//! then by position.
//!
//! ```rust,no_run
//! use sql_rowmap::prelude::*;
//!
//! #[derive(Debug, Default, Clone)]
//! struct Account {
//!     id: i64,
//!     owner: String,
//!     balance: f64,
//! }
//! impl_record!(Account { id, owner => "account_owner", balance });
//!
//! # async fn demo() -> Result<(), SqlRowMapError> {
//! let db = Database::new(ConfigAndPool::sqlite_builder("bank.db".into()).build().await?);
//!
//! let mut count = 0_i64;
//! db.query_row("SELECT COUNT(*) FROM accounts", vec![Arg::scalar(&mut count)])
//!     .await?;
//!
//! let rich: Vec<Account> = db
//!     .fetch_all("SELECT * FROM accounts WHERE balance > ?", &[RowValues::Float(1e6)])
//!     .await?;
//! # let _ = rich;
//! # Ok(()) }
//! ```

pub mod driver;
pub mod error;
pub mod executor;
pub mod mapping;
pub mod pool;
pub mod prelude;
pub mod registry;
pub mod results;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use driver::QueryDriver;
pub use error::SqlRowMapError;
pub use executor::{Database, map_result_set};
pub use mapping::{
    Arg, Destination, FromRowValue, MappingStrategy, Record, RecordDescriptor, RecordSink,
    RecordTarget, ScalarSlot,
};
pub use pool::{ConfigAndPool, MiddlewarePool};
pub use registry::{DEFAULT_DATABASE_NAME, DatabaseRegistry};
pub use results::{CustomDbRow, ResultSet};
pub use types::{DatabaseType, RowValues};
