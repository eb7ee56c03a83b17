use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::SqlRowMapError;
use crate::executor::Database;

/// Name used when a database is registered or looked up without one.
pub const DEFAULT_DATABASE_NAME: &str = "main";

/// Named database handles owned by the application.
///
/// The registry is an ordinary value: create one at startup and pass it (or an `Arc` of it)
/// to whatever needs database access. Reads take a shared lock; `register` and `remove`
/// take the exclusive lock only long enough to touch the map.
#[derive(Debug, Default)]
pub struct DatabaseRegistry {
    databases: RwLock<HashMap<String, Arc<Database>>>,
}

fn key(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_DATABASE_NAME
    } else {
        name
    }
}

impl DatabaseRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `db` under `name` (empty means `"main"`), returning the handle it replaced.
    pub fn register(&self, name: &str, db: Database) -> Option<Arc<Database>> {
        let name = key(name);
        debug!(database = name, "registering database");
        self.databases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::new(db))
    }

    /// Look up a database; `None` and `Some("")` both mean `"main"`.
    ///
    /// # Errors
    /// [`SqlRowMapError::ConfigError`] when the registry is empty or the name is unknown.
    pub fn get(&self, name: Option<&str>) -> Result<Arc<Database>, SqlRowMapError> {
        let databases = self
            .databases
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if databases.is_empty() {
            return Err(SqlRowMapError::ConfigError(
                "no databases available".to_string(),
            ));
        }
        let name = key(name.unwrap_or_default());
        databases
            .get(name)
            .cloned()
            .ok_or_else(|| SqlRowMapError::ConfigError(format!("database {name} not found")))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Database>> {
        self.databases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key(name))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .databases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.databases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a `MySQL` pool from `opts` and register it under `opts.name`.
    ///
    /// Connections are opened lazily, so an unreachable server surfaces on first use.
    ///
    /// # Errors
    /// [`SqlRowMapError::ConfigError`] when the options are invalid.
    #[cfg(feature = "mysql")]
    pub fn connect_mysql(
        &self,
        opts: &crate::mysql::MysqlOptions,
    ) -> Result<Arc<Database>, SqlRowMapError> {
        let cap = crate::pool::ConfigAndPool::new_mysql(opts)?;
        self.register(&opts.name, Database::new(cap));
        self.get(Some(&opts.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingDriver;

    fn db() -> Database {
        Database::new(RecordingDriver::empty())
    }

    #[test]
    fn empty_registry_reports_no_databases() {
        let registry = DatabaseRegistry::new();
        let err = registry.get(None).unwrap_err();
        assert!(matches!(err, SqlRowMapError::ConfigError(ref m) if m == "no databases available"));
    }

    #[test]
    fn blank_name_means_main() {
        let registry = DatabaseRegistry::new();
        assert!(registry.register("", db()).is_none());
        assert_eq!(registry.names(), vec!["main".to_string()]);
        assert!(registry.get(None).is_ok());
        assert!(registry.get(Some("")).is_ok());
        assert!(registry.get(Some("main")).is_ok());
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let registry = DatabaseRegistry::new();
        registry.register("reports", db());
        let err = registry.get(Some("billing")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: database billing not found"
        );
        let err = registry.get(None).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: database main not found");
    }

    #[test]
    fn register_replaces_and_remove_drops() {
        let registry = DatabaseRegistry::new();
        registry.register("a", db());
        assert!(registry.register("a", db()).is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.remove("a").is_some());
        assert!(registry.is_empty());
    }
}
