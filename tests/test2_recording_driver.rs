use std::sync::Arc;

use sql_rowmap::prelude::*;
use sql_rowmap::test_utils::RecordingDriver;

#[derive(Debug, Default, Clone, PartialEq)]
struct Item {
    id: i64,
    label: String,
}
impl_record!(Item { id, label });

fn items_driver() -> Arc<RecordingDriver> {
    Arc::new(RecordingDriver::new(
        ["id", "label"],
        vec![
            vec![RowValues::Int(1), RowValues::Text("first".into())],
            vec![RowValues::Int(2), RowValues::Text("second".into())],
        ],
    ))
}

#[tokio::test]
async fn single_record_query_gets_one_limit_clause() -> Result<(), SqlRowMapError> {
    let driver = items_driver();
    let db = Database::from_driver(driver.clone());

    let item: Item = db.fetch_one("SELECT id, label FROM items", &[]).await?;
    assert_eq!(item.id, 1);

    let calls = driver.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query, "SELECT id, label FROM items LIMIT 1");
    assert_eq!(calls[0].query.matches("LIMIT").count(), 1);
    assert_eq!(calls[0].max_rows, Some(1));
    Ok(())
}

#[tokio::test]
async fn existing_limit_is_left_alone() -> Result<(), SqlRowMapError> {
    let driver = items_driver();
    let db = Database::from_driver(driver.clone());

    let mut item = Item::default();
    db.query_row(
        "select id, label from items order by id limit 5",
        vec![Arg::record(&mut item)],
    )
    .await?;
    db.query_row(
        "SELECT id, label FROM items\n",
        vec![Arg::record(&mut item)],
    )
    .await?;

    assert_eq!(
        driver.queries(),
        [
            "select id, label from items order by id limit 5",
            "SELECT id, label FROM items LIMIT 1",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn scalar_and_sequence_paths_send_the_query_unchanged() -> Result<(), SqlRowMapError> {
    let driver = items_driver();
    let db = Database::from_driver(driver.clone());

    let mut id = 0_i64;
    let mut label = String::new();
    db.query_row(
        "SELECT id, label FROM items WHERE id = ?",
        vec![Arg::from(1), Arg::scalar(&mut id), Arg::scalar(&mut label)],
    )
    .await?;
    assert_eq!((id, label.as_str()), (1, "first"));

    let mut items: Vec<Item> = Vec::new();
    db.query(
        "SELECT id, label FROM items WHERE id > ?",
        vec![Arg::from(0), Arg::records(&mut items)],
    )
    .await?;
    assert_eq!(items.len(), 2);

    let calls = driver.calls();
    assert_eq!(calls[0].query, "SELECT id, label FROM items WHERE id = ?");
    assert_eq!(calls[0].params, vec![RowValues::Int(1)]);
    assert_eq!(calls[1].query, "SELECT id, label FROM items WHERE id > ?");
    assert_eq!(calls[1].max_rows, None);
    Ok(())
}

#[tokio::test]
async fn duplicate_columns_last_write_wins() -> Result<(), SqlRowMapError> {
    let driver = RecordingDriver::new(
        ["id", "label", "LABEL"],
        vec![vec![
            RowValues::Int(9),
            RowValues::Text("from t1".into()),
            RowValues::Text("from t2".into()),
        ]],
    );
    let db = Database::new(driver);

    let item: Item = db
        .fetch_one("SELECT t1.id, t1.label, t2.label FROM t1 JOIN t2", &[])
        .await?;
    assert_eq!(item.label, "from t2");
    Ok(())
}

#[tokio::test]
async fn unknown_column_names_fall_back_to_position() -> Result<(), SqlRowMapError> {
    let driver = RecordingDriver::new(
        ["item_no", "caption"],
        vec![vec![RowValues::Int(4), RowValues::Text("fourth".into())]],
    );
    let db = Database::new(driver);

    let item: Item = db.fetch_one("SELECT item_no, caption FROM items", &[]).await?;
    assert_eq!(
        item,
        Item {
            id: 4,
            label: "fourth".into(),
        }
    );
    Ok(())
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Annotated {
    id: i64,
    label: String,
    note: String,
}
impl_record!(Annotated { id, label, note });

#[tokio::test]
async fn unmapped_record_fields_keep_caller_values() -> Result<(), SqlRowMapError> {
    let db = Database::from_driver(items_driver());

    let mut annotated = Annotated {
        note: "kept".into(),
        ..Annotated::default()
    };
    db.query_row(
        "SELECT id, label FROM items",
        vec![Arg::record(&mut annotated)],
    )
    .await?;
    assert_eq!(
        annotated,
        Annotated {
            id: 1,
            label: "first".into(),
            note: "kept".into(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn sequence_keeps_rows_before_the_failing_one() {
    let driver = RecordingDriver::new(
        ["id", "label"],
        vec![
            vec![RowValues::Int(1), RowValues::Text("ok".into())],
            vec![RowValues::Text("not a number".into()), RowValues::Text("bad".into())],
            vec![RowValues::Int(3), RowValues::Text("never read".into())],
        ],
    );
    let db = Database::new(driver);

    let mut items: Vec<Item> = vec![Item {
        id: 0,
        label: "already here".into(),
    }];
    let err = db
        .query("SELECT id, label FROM items", vec![Arg::records(&mut items)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SqlRowMapError::ScanFailure { index: 0, ref column, .. } if column == "id"
    ));
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["already here", "ok"]);
}

#[tokio::test]
async fn execution_errors_reach_the_caller_unchanged() {
    let db = Database::new(RecordingDriver::failing("syntax error near FROM"));

    let mut item = Item::default();
    let err = db
        .query_row("SELECT FROM", vec![Arg::record(&mut item)])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlRowMapError::ExecutionError(ref m) if m == "syntax error near FROM"));
    assert!(err.is_execution_failure());
}

#[tokio::test]
async fn malformed_calls_never_reach_the_driver() {
    let driver = items_driver();
    let db = Database::from_driver(driver.clone());

    let err = db.query_row("SELECT 1", Vec::new()).await.unwrap_err();
    assert!(matches!(err, SqlRowMapError::MissingDestination));

    let err = db
        .query_row("SELECT 1", vec![Arg::from(1), Arg::from("x")])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlRowMapError::InvalidArguments(_)));

    let mut id = 0_i64;
    let mut item = Item::default();
    let err = db
        .query_row(
            "SELECT id, label FROM items",
            vec![Arg::scalar(&mut id), Arg::record(&mut item)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SqlRowMapError::UnsupportedDestination(_)));

    let mut items: Vec<Item> = Vec::new();
    let err = db
        .query_row("SELECT id, label FROM items", vec![Arg::records(&mut items)])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlRowMapError::UnsupportedDestination(_)));

    let err = db
        .query("SELECT id, label FROM items", vec![Arg::record(&mut item)])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlRowMapError::UnsupportedDestination(_)));

    let err = db
        .query("SELECT id, label FROM items", vec![Arg::from(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlRowMapError::InvalidArguments(_)));

    assert!(driver.calls().is_empty());
}

#[tokio::test]
async fn exec_one_bounds_the_statement() -> Result<(), SqlRowMapError> {
    let driver = items_driver();
    let db = Database::from_driver(driver.clone());

    db.exec_one("DELETE FROM items WHERE label = ?", &[RowValues::from("first")])
        .await?;
    db.exec("DELETE FROM items", &[]).await?;

    assert_eq!(
        driver.queries(),
        ["DELETE FROM items WHERE label = ? LIMIT 1", "DELETE FROM items"]
    );
    Ok(())
}

#[tokio::test]
async fn raw_rows_can_be_mapped_later() -> Result<(), SqlRowMapError> {
    let db = Database::from_driver(items_driver());

    let result = db.select("SELECT id, label FROM items", &[]).await?;
    assert_eq!(result.column_names(), ["id", "label"]);
    let items: Vec<Item> = map_result_set(result, MappingStrategy::default())?;
    assert_eq!(items[1].label, "second");
    Ok(())
}
