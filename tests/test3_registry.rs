#![cfg(feature = "sqlite")]

use std::sync::Arc;

use sql_rowmap::prelude::*;

#[tokio::test]
async fn registered_handles_are_shared_across_tasks() -> Result<(), SqlRowMapError> {
    let dir = tempfile::tempdir()
        .map_err(|e| SqlRowMapError::ConfigError(format!("tempdir: {e}")))?;
    let path = dir.path().join("registry.db");
    let cap = ConfigAndPool::sqlite_builder(path.to_string_lossy().into_owned())
        .build()
        .await?;

    let registry = Arc::new(DatabaseRegistry::new());
    registry.register("", Database::new(cap));
    registry
        .get(None)?
        .execute_batch("CREATE TABLE counters (n INTEGER); INSERT INTO counters VALUES (41);")
        .await?;

    let worker = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            let db = registry.get(Some(DEFAULT_DATABASE_NAME))?;
            db.exec("UPDATE counters SET n = n + 1", &[]).await
        })
    };
    let updated = worker
        .await
        .map_err(|e| SqlRowMapError::ExecutionError(format!("join error: {e}")))??;
    assert_eq!(updated, 1);

    let mut n = 0_i64;
    registry
        .get(Some("main"))?
        .query_row("SELECT n FROM counters", vec![Arg::scalar(&mut n)])
        .await?;
    assert_eq!(n, 42);

    assert!(registry.get(Some("reports")).is_err());
    Ok(())
}
