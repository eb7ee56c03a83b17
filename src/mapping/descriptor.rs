use crate::types::RowValues;

/// One field of a structured destination.
///
/// `ordinal` is the declaration position and doubles as the storage slot handed to
/// [`Record::write_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub ordinal: usize,
    pub name: &'static str,
    pub alias: Option<&'static str>,
}

impl FieldDescriptor {
    /// Column name this field answers to first: the alias if declared, else the field name.
    #[must_use]
    pub fn column_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

/// Ordered field metadata for one record type. Built once per type and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Build a descriptor from `(field name, alias)` pairs in declaration order.
    #[must_use]
    pub fn new(type_name: &'static str, fields: &[(&'static str, Option<&'static str>)]) -> Self {
        let fields = fields
            .iter()
            .enumerate()
            .map(|(ordinal, &(name, alias))| FieldDescriptor {
                ordinal,
                name,
                alias,
            })
            .collect();
        Self { type_name, fields }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field whose declared alias equals `column`, ignoring ASCII case.
    #[must_use]
    pub fn field_by_alias(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.alias.is_some_and(|alias| alias.eq_ignore_ascii_case(column)))
    }

    /// First field whose declared name equals `column`, ignoring ASCII case.
    #[must_use]
    pub fn field_by_name(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(column))
    }

    #[must_use]
    pub fn field_at(&self, ordinal: usize) -> Option<&FieldDescriptor> {
        self.fields.get(ordinal)
    }
}

/// A structured destination type.
///
/// Usually implemented with [`impl_record!`](crate::impl_record), which derives the
/// descriptor from the struct's field list.
pub trait Record: Default + Clone + Send + 'static {
    /// Field metadata, in declaration order.
    fn descriptor() -> &'static RecordDescriptor;

    /// Convert `value` into the field at `ordinal` and store it.
    ///
    /// # Errors
    /// Returns a human-readable reason when the value does not fit the field's type or
    /// `ordinal` is out of range.
    fn write_field(&mut self, ordinal: usize, value: RowValues) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> RecordDescriptor {
        RecordDescriptor::new(
            "User",
            &[("id", None), ("name", Some("user_name")), ("email", None)],
        )
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        let desc = users();
        let ordinals: Vec<usize> = desc.fields().iter().map(|f| f.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(desc.field_at(1).map(FieldDescriptor::column_name), Some("user_name"));
    }

    #[test]
    fn lookups_ignore_case() {
        let desc = users();
        assert_eq!(desc.field_by_alias("USER_NAME").map(|f| f.ordinal), Some(1));
        assert_eq!(desc.field_by_name("Email").map(|f| f.ordinal), Some(2));
        assert!(desc.field_by_alias("name").is_none());
    }
}
