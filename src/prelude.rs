//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::driver::QueryDriver;
pub use crate::error::SqlRowMapError;
pub use crate::executor::{Database, map_result_set};
pub use crate::impl_record;
pub use crate::mapping::{
    Arg, ClassifiedArgs, Destination, FromRowValue, MappingStrategy, Record, RecordDescriptor,
    RecordSink, RecordTarget, ScalarSlot, classify, classify_trailing,
};
pub use crate::pool::{ConfigAndPool, MiddlewarePool};
pub use crate::registry::{DEFAULT_DATABASE_NAME, DatabaseRegistry};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};

#[cfg(feature = "mysql")]
pub use crate::mysql::{MysqlOptions, MysqlOptionsBuilder, MysqlProtocol};
