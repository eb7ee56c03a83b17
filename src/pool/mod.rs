pub mod types;

pub use types::MiddlewarePool;

use crate::types::DatabaseType;

/// Configuration and connection pool for a database
///
/// This struct holds both the configuration and the connection pool
/// for a database. It implements [`QueryDriver`](crate::QueryDriver), so it can be
/// wrapped in a [`Database`](crate::Database) directly.
#[derive(Clone, Debug)]
pub struct ConfigAndPool {
    /// The connection pool
    pub pool: MiddlewarePool,
    /// The database type
    pub db_type: DatabaseType,
}
