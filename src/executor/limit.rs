use std::borrow::Cow;

/// Whether `query` already carries a row-limiting clause.
///
/// This is a case-insensitive substring check, not SQL parsing: a `limit` inside a string
/// literal or subquery counts too.
#[must_use]
pub fn has_row_limit(query: &str) -> bool {
    query.to_ascii_uppercase().contains("LIMIT")
}

/// `query` bounded to at most one row, appending `LIMIT 1` when no limit is present.
#[must_use]
pub fn limit_to_one_row(query: &str) -> Cow<'_, str> {
    if has_row_limit(query) {
        Cow::Borrowed(query)
    } else {
        Cow::Owned(format!("{} LIMIT 1", query.trim_end()))
    }
}
