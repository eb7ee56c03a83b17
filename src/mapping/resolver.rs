use tracing::trace;

use super::descriptor::RecordDescriptor;

/// How result columns are matched to record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingStrategy {
    /// Alias, then field name (both case-insensitive), then column position.
    #[default]
    NameThenPosition,
    /// Column `i` goes to field `i`; names are ignored.
    Positional,
}

/// Where one result column ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTarget {
    /// Storage slot (field ordinal) of the destination record.
    Field(usize),
    /// Read and dropped.
    Discard,
}

/// Assignment of every column index of one result set to a field slot or the discard sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPlan {
    targets: Vec<ColumnTarget>,
}

impl MappingPlan {
    #[must_use]
    pub fn targets(&self) -> &[ColumnTarget] {
        &self.targets
    }

    /// Target for column `index`; columns the plan never saw are discarded.
    #[must_use]
    pub fn target(&self, index: usize) -> ColumnTarget {
        self.targets
            .get(index)
            .copied()
            .unwrap_or(ColumnTarget::Discard)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of columns routed to the discard sink.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| matches!(t, ColumnTarget::Discard))
            .count()
    }
}

/// Resolve each column against the record, first match wins per column.
///
/// Duplicate column names are resolved independently, so two columns may target the
/// same field; the later column's value is the one that sticks.
#[must_use]
pub fn resolve(columns: &[String], record: &RecordDescriptor) -> MappingPlan {
    let targets = columns
        .iter()
        .enumerate()
        .map(|(index, column)| resolve_column(index, column, record))
        .collect();
    let plan = MappingPlan { targets };
    trace!(
        record = record.type_name(),
        columns = plan.len(),
        discarded = plan.discarded(),
        "resolved mapping plan"
    );
    plan
}

/// Column `i` maps to field `i`; columns past the last field are discarded.
#[must_use]
pub fn resolve_positional(columns: &[String], record: &RecordDescriptor) -> MappingPlan {
    let targets = (0..columns.len())
        .map(|index| positional(index, record))
        .collect();
    MappingPlan { targets }
}

/// Resolve with the given strategy.
#[must_use]
pub fn resolve_with(
    strategy: MappingStrategy,
    columns: &[String],
    record: &RecordDescriptor,
) -> MappingPlan {
    match strategy {
        MappingStrategy::NameThenPosition => resolve(columns, record),
        MappingStrategy::Positional => resolve_positional(columns, record),
    }
}

fn resolve_column(index: usize, column: &str, record: &RecordDescriptor) -> ColumnTarget {
    if let Some(field) = record.field_by_alias(column) {
        return ColumnTarget::Field(field.ordinal);
    }
    if let Some(field) = record.field_by_name(column) {
        return ColumnTarget::Field(field.ordinal);
    }
    positional(index, record)
}

fn positional(index: usize, record: &RecordDescriptor) -> ColumnTarget {
    record
        .field_at(index)
        .map_or(ColumnTarget::Discard, |field| ColumnTarget::Field(field.ordinal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ColumnTarget::{Discard, Field};

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn user() -> RecordDescriptor {
        RecordDescriptor::new(
            "User",
            &[("id", None), ("name", Some("full_name")), ("email", None)],
        )
    }

    #[test]
    fn every_column_matched_by_name_or_alias() {
        let plan = resolve(&cols(&["EMAIL", "id", "Full_Name"]), &user());
        assert_eq!(plan.targets(), [Field(2), Field(0), Field(1)]);
        assert_eq!(plan.discarded(), 0);
    }

    #[test]
    fn alias_beats_field_name() {
        let desc = RecordDescriptor::new("Swap", &[("a", Some("b")), ("b", Some("a"))]);
        let plan = resolve(&cols(&["a", "b"]), &desc);
        assert_eq!(plan.targets(), [Field(1), Field(0)]);
    }

    #[test]
    fn unknown_names_fall_back_to_position() {
        let plan = resolve(&cols(&["user_id", "n", "e"]), &user());
        assert_eq!(plan.targets(), [Field(0), Field(1), Field(2)]);
    }

    #[test]
    fn excess_columns_are_discarded() {
        let plan = resolve(&cols(&["id", "full_name", "email", "created_at", "x"]), &user());
        assert_eq!(
            plan.targets(),
            [Field(0), Field(1), Field(2), Discard, Discard]
        );
        assert_eq!(plan.discarded(), 2);
    }

    #[test]
    fn fewer_columns_leave_fields_unmapped() {
        let plan = resolve(&cols(&["id"]), &user());
        assert_eq!(plan.targets(), [Field(0)]);
        assert_eq!(plan.target(1), Discard);
    }

    #[test]
    fn duplicate_columns_resolve_independently() {
        let plan = resolve(&cols(&["id", "id"]), &user());
        assert_eq!(plan.targets(), [Field(0), Field(0)]);
    }

    #[test]
    fn positional_strategy_ignores_names() {
        let columns = cols(&["email", "id", "full_name", "extra"]);
        let plan = resolve_with(MappingStrategy::Positional, &columns, &user());
        assert_eq!(plan.targets(), [Field(0), Field(1), Field(2), Discard]);
    }
}
