use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use super::convert::ScalarSlot;
use super::descriptor::Record;
use super::row_mapper::{RecordSink, RecordTarget};
use crate::error::SqlRowMapError;
use crate::types::RowValues;

/// A writable destination supplied by the caller.
pub enum Destination<'a> {
    /// One scalar output variable.
    Scalar(&'a mut dyn ScalarSlot),
    /// One structured record.
    Record(&'a mut dyn RecordTarget),
    /// A growable sequence of records.
    Records(&'a mut dyn RecordSink),
}

impl Destination<'_> {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Destination::Scalar(_) => "scalar",
            Destination::Record(_) => "record",
            Destination::Records(_) => "record sequence",
        }
    }
}

impl std::fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Destination").field(&self.kind()).finish()
    }
}

/// One argument of a variadic-style call: a query parameter or an output destination.
///
/// ```rust
/// use sql_rowmap::prelude::*;
///
/// let mut id = 0_i64;
/// let mut name = String::new();
/// let args = vec![
///     Arg::from("alice@example.com"),
///     Arg::scalar(&mut id),
///     Arg::scalar(&mut name),
/// ];
/// let split = classify(args).unwrap();
/// assert_eq!(split.params, vec![RowValues::Text("alice@example.com".into())]);
/// assert_eq!(split.dests.len(), 2);
/// ```
#[derive(Debug)]
pub enum Arg<'a> {
    Param(RowValues),
    Dest(Destination<'a>),
}

impl<'a> Arg<'a> {
    pub fn param(value: impl Into<RowValues>) -> Self {
        Arg::Param(value.into())
    }

    pub fn scalar<T: ScalarSlot>(slot: &'a mut T) -> Self {
        Arg::Dest(Destination::Scalar(slot))
    }

    pub fn record<T: Record>(record: &'a mut T) -> Self {
        Arg::Dest(Destination::Record(record))
    }

    pub fn records<T: Record>(records: &'a mut Vec<T>) -> Self {
        Arg::Dest(Destination::Records(records))
    }

    #[must_use]
    pub fn is_destination(&self) -> bool {
        matches!(self, Arg::Dest(_))
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(value: $ty) -> Self {
                    Arg::Param(value.into())
                }
            }
        )*
    };
}

impl_arg_from!(RowValues, i64, i32, u32, f64, bool, String, &str, NaiveDateTime, JsonValue, Vec<u8>);

impl<'a> From<Destination<'a>> for Arg<'a> {
    fn from(dest: Destination<'a>) -> Self {
        Arg::Dest(dest)
    }
}

/// Parameters and destinations of one call, split at the first destination.
#[derive(Debug)]
pub struct ClassifiedArgs<'a> {
    pub params: Vec<RowValues>,
    pub dests: Vec<Destination<'a>>,
}

/// Split `args` at the first destination argument.
///
/// Everything before it is passed to the query verbatim; everything from it onward must
/// be a destination.
///
/// # Errors
/// - [`SqlRowMapError::MissingDestination`] when `args` is empty.
/// - [`SqlRowMapError::InvalidArguments`] when no destination is present, or a parameter
///   follows the first destination.
pub fn classify(args: Vec<Arg<'_>>) -> Result<ClassifiedArgs<'_>, SqlRowMapError> {
    if args.is_empty() {
        return Err(SqlRowMapError::MissingDestination);
    }
    let split = args.iter().position(Arg::is_destination).ok_or_else(|| {
        SqlRowMapError::InvalidArguments("no destination argument found".to_string())
    })?;

    let mut params = Vec::with_capacity(split);
    let mut dests = Vec::with_capacity(args.len() - split);
    for (idx, arg) in args.into_iter().enumerate() {
        match arg {
            Arg::Param(value) if idx < split => params.push(value),
            Arg::Dest(dest) => dests.push(dest),
            Arg::Param(_) => {
                return Err(SqlRowMapError::InvalidArguments(format!(
                    "dests must be a pointer: argument {idx} is a parameter after the first destination"
                )));
            }
        }
    }
    Ok(ClassifiedArgs { params, dests })
}

/// Split `args` for a multi-row call: the last argument is the destination, the rest are
/// parameters.
///
/// # Errors
/// - [`SqlRowMapError::MissingDestination`] when `args` is empty.
/// - [`SqlRowMapError::InvalidArguments`] when the last argument is a parameter or an
///   earlier argument is a destination.
pub fn classify_trailing(
    mut args: Vec<Arg<'_>>,
) -> Result<(Vec<RowValues>, Destination<'_>), SqlRowMapError> {
    let Some(last) = args.pop() else {
        return Err(SqlRowMapError::MissingDestination);
    };
    let Arg::Dest(dest) = last else {
        return Err(SqlRowMapError::InvalidArguments(
            "dest must be a pointer: the last argument is a parameter".to_string(),
        ));
    };
    let params = args
        .into_iter()
        .enumerate()
        .map(|(idx, arg)| match arg {
            Arg::Param(value) => Ok(value),
            Arg::Dest(_) => Err(SqlRowMapError::InvalidArguments(format!(
                "only the last argument may be a destination, found one at {idx}"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((params, dest))
}
