use std::sync::Arc;

use super::row::CustomDbRow;
use crate::types::RowValues;

/// A result set from a database query
///
/// Holds the column metadata reported by the driver and the rows it returned, in
/// cursor order. The driver's own cursor is closed before a `ResultSet` is handed out.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    /// The number of rows affected (for DML statements) or read (for SELECT)
    pub rows_affected: usize,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Arc<Vec<String>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: Arc::new(Vec::new()),
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_names = column_names;
    }

    /// Column names in result order. Empty when the statement produced no columns.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Add a row to the result set
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        let row = CustomDbRow::new(Arc::clone(&self.column_names), row_values);
        self.results.push(row);
        self.rows_affected += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Split into the column names and the raw values of each row, in cursor order.
    #[must_use]
    pub fn into_parts(self) -> (Arc<Vec<String>>, Vec<Vec<RowValues>>) {
        let rows = self
            .results
            .into_iter()
            .map(CustomDbRow::into_values)
            .collect();
        (self.column_names, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["id".into(), "Name".into()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("Alice".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("Bob".into())]);
        rs
    }

    #[test]
    fn rows_share_column_names() {
        let rs = sample();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.rows_affected, 2);
        assert!(Arc::ptr_eq(
            &rs.results[0].column_names,
            &rs.results[1].column_names
        ));
    }

    #[test]
    fn lookup_by_name_falls_back_to_case_insensitive() {
        let rs = sample();
        let row = &rs.results[1];
        assert_eq!(row.get("Name"), Some(&RowValues::Text("Bob".into())));
        assert_eq!(row.get("NAME"), Some(&RowValues::Text("Bob".into())));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_by_index(0), Some(&RowValues::Int(2)));
    }

    #[test]
    fn into_parts_keeps_cursor_order() {
        let (cols, rows) = sample().into_parts();
        assert_eq!(cols.as_slice(), ["id", "Name"]);
        assert_eq!(rows[0][0], RowValues::Int(1));
        assert_eq!(rows[1][0], RowValues::Int(2));
    }
}
