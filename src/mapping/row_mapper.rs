use super::descriptor::{Record, RecordDescriptor};
use super::resolver::{ColumnTarget, MappingPlan};
use crate::error::SqlRowMapError;
use crate::types::RowValues;

/// Map one row into a fresh record.
///
/// # Errors
/// Returns [`SqlRowMapError::ScanFailure`] naming the first column that failed to convert.
pub fn map_row<T: Record>(
    plan: &MappingPlan,
    columns: &[String],
    row: Vec<RowValues>,
) -> Result<T, SqlRowMapError> {
    map_row_onto(T::default(), plan, columns, row)
}

/// Write one row over `staged`, leaving fields no column maps to as they were.
///
/// `staged` is only returned when every mapped column converted, so callers that commit
/// the result never see a half-filled value.
///
/// # Errors
/// Returns [`SqlRowMapError::ScanFailure`] naming the first column that failed to convert.
pub fn map_row_onto<T: Record>(
    mut staged: T,
    plan: &MappingPlan,
    columns: &[String],
    row: Vec<RowValues>,
) -> Result<T, SqlRowMapError> {
    for (index, value) in row.into_iter().enumerate() {
        match plan.target(index) {
            ColumnTarget::Field(ordinal) => {
                staged
                    .write_field(ordinal, value)
                    .map_err(|reason| scan_failure(index, columns, reason))?;
            }
            ColumnTarget::Discard => drop(value),
        }
    }
    Ok(staged)
}

pub(crate) fn scan_failure(index: usize, columns: &[String], reason: String) -> SqlRowMapError {
    SqlRowMapError::ScanFailure {
        index,
        column: columns.get(index).cloned().unwrap_or_default(),
        reason,
    }
}

/// A single caller-owned record destination.
pub trait RecordTarget: Send {
    fn record_descriptor(&self) -> &'static RecordDescriptor;

    /// Write the mapped row into the destination. Fields without a column keep their
    /// current values; on error the destination is untouched.
    ///
    /// # Errors
    /// Propagates [`SqlRowMapError::ScanFailure`] from [`map_row`].
    fn map_from(
        &mut self,
        plan: &MappingPlan,
        columns: &[String],
        row: Vec<RowValues>,
    ) -> Result<(), SqlRowMapError>;
}

impl<T: Record> RecordTarget for T {
    fn record_descriptor(&self) -> &'static RecordDescriptor {
        T::descriptor()
    }

    fn map_from(
        &mut self,
        plan: &MappingPlan,
        columns: &[String],
        row: Vec<RowValues>,
    ) -> Result<(), SqlRowMapError> {
        *self = map_row_onto(self.clone(), plan, columns, row)?;
        Ok(())
    }
}

/// A caller-owned growable sequence of records; one record is appended per row.
pub trait RecordSink: Send {
    fn record_descriptor(&self) -> &'static RecordDescriptor;

    /// Map `row` and append it. Records appended by earlier calls are never touched.
    ///
    /// # Errors
    /// Propagates [`SqlRowMapError::ScanFailure`] from [`map_row`]; nothing is appended.
    fn append_from(
        &mut self,
        plan: &MappingPlan,
        columns: &[String],
        row: Vec<RowValues>,
    ) -> Result<(), SqlRowMapError>;

    /// Records currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record> RecordSink for Vec<T> {
    fn record_descriptor(&self) -> &'static RecordDescriptor {
        T::descriptor()
    }

    fn append_from(
        &mut self,
        plan: &MappingPlan,
        columns: &[String],
        row: Vec<RowValues>,
    ) -> Result<(), SqlRowMapError> {
        let record = map_row::<T>(plan, columns, row)?;
        self.push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_record;
    use crate::mapping::resolver::resolve;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Account {
        id: i64,
        owner: String,
        balance: Option<f64>,
        note: String,
    }

    impl_record!(Account {
        id,
        owner => "owner_name",
        balance,
        note,
    });

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn maps_named_columns_and_skips_extras() {
        let columns = cols(&["owner_name", "id", "balance", "note", "audit"]);
        let plan = resolve(&columns, Account::descriptor());
        let row = vec![
            RowValues::Text("ann".into()),
            RowValues::Int(7),
            RowValues::Null,
            RowValues::Text("hi".into()),
            RowValues::Blob(vec![1, 2]),
        ];
        let acct: Account = map_row(&plan, &columns, row).unwrap();
        assert_eq!(
            acct,
            Account {
                id: 7,
                owner: "ann".into(),
                balance: None,
                note: "hi".into(),
            }
        );
    }

    #[test]
    fn fields_without_a_column_keep_caller_values() {
        let columns = cols(&["id", "owner_name"]);
        let plan = resolve(&columns, Account::descriptor());
        let mut acct = Account {
            balance: Some(12.5),
            note: "set by caller".into(),
            ..Account::default()
        };
        acct.map_from(
            &plan,
            &columns,
            vec![RowValues::Int(1), RowValues::Text("bo".into())],
        )
        .unwrap();
        assert_eq!(acct.id, 1);
        assert_eq!(acct.owner, "bo");
        assert_eq!(acct.balance, Some(12.5));
        assert_eq!(acct.note, "set by caller");

        let fresh: Account = map_row(
            &plan,
            &columns,
            vec![RowValues::Int(2), RowValues::Text("cy".into())],
        )
        .unwrap();
        assert_eq!(fresh.note, "");
    }

    #[test]
    fn failed_conversion_leaves_target_untouched() {
        let columns = cols(&["id", "owner_name"]);
        let plan = resolve(&columns, Account::descriptor());
        let mut acct = Account {
            id: 99,
            owner: "keep".into(),
            ..Account::default()
        };
        let err = acct
            .map_from(
                &plan,
                &columns,
                vec![RowValues::Int(1), RowValues::Int(2)],
            )
            .unwrap_err();
        match err {
            SqlRowMapError::ScanFailure { index, column, .. } => {
                assert_eq!(index, 1);
                assert_eq!(column, "owner_name");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(acct.id, 99);
        assert_eq!(acct.owner, "keep");
    }

    #[test]
    fn duplicate_columns_last_write_wins() {
        let columns = cols(&["id", "id"]);
        let plan = resolve(&columns, Account::descriptor());
        let acct: Account =
            map_row(&plan, &columns, vec![RowValues::Int(1), RowValues::Int(2)]).unwrap();
        assert_eq!(acct.id, 2);
    }

    #[test]
    fn sink_keeps_rows_appended_before_a_failure() {
        let columns = cols(&["id"]);
        let plan = resolve(&columns, Account::descriptor());
        let mut accounts: Vec<Account> = Vec::new();
        accounts
            .append_from(&plan, &columns, vec![RowValues::Int(1)])
            .unwrap();
        assert!(
            accounts
                .append_from(&plan, &columns, vec![RowValues::Text("x".into())])
                .is_err()
        );
        assert_eq!(RecordSink::len(&accounts), 1);
        assert_eq!(accounts[0].id, 1);
    }
}
