#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;

/// Connection pool for database access
///
/// This enum wraps the different connection pool types for the
/// supported database engines.
#[derive(Clone)]
pub enum MiddlewarePool {
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::Pool<SqliteManager>),
    /// `MySQL` connection pool
    #[cfg(feature = "mysql")]
    Mysql(mysql_async::Pool),
}

// Manual Debug implementation because bb8 pools only print their state
impl std::fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => f
                .debug_tuple("Sqlite")
                .field(&format_args!("connections={}", pool.state().connections))
                .finish(),
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => f.debug_tuple("Mysql").field(&"<mysql_async::Pool>").finish(),
            #[allow(unreachable_patterns)]
            _ => f.write_str("MiddlewarePool"),
        }
    }
}
