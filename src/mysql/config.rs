use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use mysql_async::{Opts, OptsBuilder, PoolConstraints, PoolOpts};
use serde::{Deserialize, Serialize};

use crate::error::SqlRowMapError;
use crate::pool::{ConfigAndPool, MiddlewarePool};
use crate::types::DatabaseType;

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_MAX_IDLE_CONNS: usize = 10;
pub const DEFAULT_MAX_OPEN_CONNS: usize = 128;
pub const DEFAULT_CONN_MAX_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Transport used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MysqlProtocol {
    #[default]
    Tcp,
    /// Unix domain socket; `host` holds the socket path.
    Unix,
}

impl MysqlProtocol {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MysqlProtocol::Tcp => "tcp",
            MysqlProtocol::Unix => "unix",
        }
    }
}

impl FromStr for MysqlProtocol {
    type Err = SqlRowMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "tcp" => Ok(MysqlProtocol::Tcp),
            "unix" => Ok(MysqlProtocol::Unix),
            other => Err(SqlRowMapError::ConfigError(format!(
                "unsupported MySQL protocol {other:?}; expected \"tcp\" or \"unix\""
            ))),
        }
    }
}

/// Options for configuring a `MySQL` pool.
///
/// `name` is the key the handle is registered under in a
/// [`DatabaseRegistry`](crate::DatabaseRegistry).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysqlOptions {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub protocol: MysqlProtocol,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_idle_conns: usize,
    pub max_open_conns: usize,
    /// `None` keeps connections forever.
    pub conn_max_lifetime: Option<Duration>,
}

impl Default for MysqlOptions {
    fn default() -> Self {
        Self {
            name: crate::registry::DEFAULT_DATABASE_NAME.to_string(),
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            protocol: MysqlProtocol::Tcp,
            username: String::new(),
            password: String::new(),
            database: String::new(),
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            max_open_conns: DEFAULT_MAX_OPEN_CONNS,
            conn_max_lifetime: Some(DEFAULT_CONN_MAX_LIFETIME),
        }
    }
}

impl fmt::Debug for MysqlOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlOptions")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("protocol", &self.protocol)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("max_open_conns", &self.max_open_conns)
            .field("conn_max_lifetime", &self.conn_max_lifetime)
            .finish()
    }
}

impl MysqlOptions {
    #[must_use]
    pub fn new(host: impl Into<String>, username: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Go-style DSN, `user:pass@tcp(host:port)/database`.
    #[must_use]
    pub fn dsn(&self) -> String {
        self.render_dsn(&self.password)
    }

    /// [`dsn`](Self::dsn) with the password masked, safe for logs.
    #[must_use]
    pub fn redacted_dsn(&self) -> String {
        self.render_dsn("***")
    }

    fn render_dsn(&self, password: &str) -> String {
        let address = match self.protocol {
            MysqlProtocol::Tcp => format!("{}:{}", self.host, self.port),
            MysqlProtocol::Unix => self.host.clone(),
        };
        format!(
            "{}:{}@{}({})/{}",
            self.username,
            password,
            self.protocol.as_str(),
            address,
            self.database
        )
    }

    pub(crate) fn validate(&self) -> Result<(), SqlRowMapError> {
        if self.host.is_empty() {
            return Err(SqlRowMapError::ConfigError(
                "MySQL host must not be empty".to_string(),
            ));
        }
        if self.max_open_conns == 0 {
            return Err(SqlRowMapError::ConfigError(
                "max_open_conns must be at least 1".to_string(),
            ));
        }
        if self.max_idle_conns > self.max_open_conns {
            return Err(SqlRowMapError::ConfigError(format!(
                "max_idle_conns ({}) exceeds max_open_conns ({})",
                self.max_idle_conns, self.max_open_conns
            )));
        }
        Ok(())
    }

    /// Driver options for `mysql_async`.
    ///
    /// # Errors
    /// Returns `SqlRowMapError::ConfigError` if the options are inconsistent.
    pub fn to_opts(&self) -> Result<Opts, SqlRowMapError> {
        self.validate()?;
        let constraints = PoolConstraints::new(self.max_idle_conns, self.max_open_conns)
            .ok_or_else(|| {
                SqlRowMapError::ConfigError("invalid MySQL pool constraints".to_string())
            })?;
        let pool_opts = PoolOpts::default()
            .with_constraints(constraints)
            .with_abs_conn_ttl(self.conn_max_lifetime);

        let builder = OptsBuilder::default()
            .user(Some(self.username.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            .pool_opts(pool_opts);
        let builder = match self.protocol {
            MysqlProtocol::Tcp => builder.ip_or_hostname(self.host.clone()).tcp_port(self.port),
            MysqlProtocol::Unix => builder.socket(Some(self.host.clone())),
        };
        Ok(Opts::from(builder))
    }
}

/// Fluent builder for `MySQL` options.
#[derive(Debug, Clone, Default)]
pub struct MysqlOptionsBuilder {
    opts: MysqlOptions,
}

impl MysqlOptionsBuilder {
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            opts: MysqlOptions {
                host: host.into(),
                ..MysqlOptions::default()
            },
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.opts.name = name.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn protocol(mut self, protocol: MysqlProtocol) -> Self {
        self.opts.protocol = protocol;
        self
    }

    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.opts.username = username.into();
        self.opts.password = password.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.opts.database = database.into();
        self
    }

    #[must_use]
    pub fn max_idle_conns(mut self, max_idle_conns: usize) -> Self {
        self.opts.max_idle_conns = max_idle_conns;
        self
    }

    #[must_use]
    pub fn max_open_conns(mut self, max_open_conns: usize) -> Self {
        self.opts.max_open_conns = max_open_conns;
        self
    }

    /// `None` keeps connections forever.
    #[must_use]
    pub fn conn_max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.opts.conn_max_lifetime = lifetime;
        self
    }

    #[must_use]
    pub fn finish(self) -> MysqlOptions {
        self.opts
    }

    /// Build a `ConfigAndPool` for `MySQL`.
    ///
    /// # Errors
    /// Returns `SqlRowMapError::ConfigError` if the options are invalid.
    pub fn build(self) -> Result<ConfigAndPool, SqlRowMapError> {
        ConfigAndPool::new_mysql(&self.finish())
    }
}

impl ConfigAndPool {
    #[must_use]
    pub fn mysql_builder(host: impl Into<String>) -> MysqlOptionsBuilder {
        MysqlOptionsBuilder::new(host)
    }

    /// Create a `MySQL` pool. Connections are opened lazily on first use.
    ///
    /// # Errors
    /// Returns `SqlRowMapError::ConfigError` if the options are invalid.
    pub fn new_mysql(opts: &MysqlOptions) -> Result<Self, SqlRowMapError> {
        let driver_opts = opts.to_opts()?;
        tracing::debug!(dsn = %opts.redacted_dsn(), "creating MySQL pool");
        Ok(ConfigAndPool {
            pool: MiddlewarePool::Mysql(mysql_async::Pool::new(driver_opts)),
            db_type: DatabaseType::Mysql,
        })
    }
}
