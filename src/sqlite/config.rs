use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool};
use tokio::sync::Mutex;

use crate::error::SqlRowMapError;
use crate::pool::{ConfigAndPool, MiddlewarePool};
use crate::types::DatabaseType;

use super::executor::run_blocking;

/// A pooled `SQLite` connection. Blocking work locks it from a `spawn_blocking` thread.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// bb8 manager that opens `SQLite` connections for one database path.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    db_path: String,
}

impl SqliteManager {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = rusqlite::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.db_path.clone();
        async move {
            let conn = rusqlite::Connection::open(&path)?;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let handle = Arc::clone(conn);
        async move {
            let guard = handle.lock().await;
            guard.query_row("SELECT 1", [], |_| Ok(()))
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Options for configuring a `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Upper bound on pooled connections.
    pub max_open_conns: u32,
    /// Connections kept open while idle; `None` lets the pool shrink to zero.
    pub max_idle_conns: Option<u32>,
    /// Recycle connections older than this; `None` keeps them forever.
    pub conn_max_lifetime: Option<Duration>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            max_open_conns: 16,
            max_idle_conns: None,
            conn_max_lifetime: None,
        }
    }

    fn validate(&self) -> Result<(), SqlRowMapError> {
        if self.max_open_conns == 0 {
            return Err(SqlRowMapError::ConfigError(
                "max_open_conns must be at least 1".to_string(),
            ));
        }
        match self.max_idle_conns {
            Some(idle) if idle > self.max_open_conns => Err(SqlRowMapError::ConfigError(format!(
                "max_idle_conns ({idle}) exceeds max_open_conns ({})",
                self.max_open_conns
            ))),
            _ => Ok(()),
        }
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn max_open_conns(mut self, max_open_conns: u32) -> Self {
        self.opts.max_open_conns = max_open_conns;
        self
    }

    #[must_use]
    pub fn max_idle_conns(mut self, max_idle_conns: Option<u32>) -> Self {
        self.opts.max_idle_conns = max_idle_conns;
        self
    }

    #[must_use]
    pub fn conn_max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.opts.conn_max_lifetime = lifetime;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a `ConfigAndPool` for `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqlRowMapError` if the options are invalid, or pool creation or the
    /// initial smoke test fails.
    pub async fn build(self) -> Result<ConfigAndPool, SqlRowMapError> {
        ConfigAndPool::new_sqlite(self.finish()).await
    }
}

impl ConfigAndPool {
    #[must_use]
    pub fn sqlite_builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Asynchronous initializer for `ConfigAndPool` with `SQLite` using bb8.
    ///
    /// # Errors
    /// Returns `SqlRowMapError::ConfigError` for invalid options and
    /// `SqlRowMapError::ConnectionError` if pool creation or the connection test fails.
    pub async fn new_sqlite(opts: SqliteOptions) -> Result<Self, SqlRowMapError> {
        opts.validate()?;

        let pool = Pool::builder()
            .max_size(opts.max_open_conns)
            .min_idle(opts.max_idle_conns)
            .max_lifetime(opts.conn_max_lifetime)
            .build(SqliteManager::new(opts.db_path.clone()))
            .await
            .map_err(|e| {
                SqlRowMapError::ConnectionError(format!("Failed to create SQLite pool: {e}"))
            })?;

        // Smoke test a connection and switch the database to WAL
        {
            let conn = pool.get().await?;
            run_blocking(Arc::clone(&*conn), |guard| {
                guard
                    .query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
                    .map_err(SqlRowMapError::SqliteError)
            })
            .await?;
        }

        Ok(ConfigAndPool {
            pool: MiddlewarePool::Sqlite(pool),
            db_type: DatabaseType::Sqlite,
        })
    }
}
