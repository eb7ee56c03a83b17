use super::args::Destination;
use super::convert::ScalarSlot;
use super::row_mapper::{RecordSink, RecordTarget};
use crate::error::SqlRowMapError;

/// Mapping strategy chosen from the destination run.
pub enum DestinationShape<'a> {
    /// Discrete output variables, written by position.
    ScalarList(Vec<&'a mut dyn ScalarSlot>),
    /// One record, filled from the first row.
    SingleRecord(&'a mut dyn RecordTarget),
    /// A record sequence, one record appended per row.
    RecordSequence(&'a mut dyn RecordSink),
}

impl DestinationShape<'_> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DestinationShape::ScalarList(_) => "scalar list",
            DestinationShape::SingleRecord(_) => "single record",
            DestinationShape::RecordSequence(_) => "record sequence",
        }
    }
}

impl std::fmt::Debug for DestinationShape<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestinationShape::ScalarList(slots) => {
                f.debug_tuple("ScalarList").field(&slots.len()).finish()
            }
            DestinationShape::SingleRecord(target) => f
                .debug_tuple("SingleRecord")
                .field(&target.record_descriptor().type_name())
                .finish(),
            DestinationShape::RecordSequence(sink) => f
                .debug_tuple("RecordSequence")
                .field(&sink.record_descriptor().type_name())
                .finish(),
        }
    }
}

/// Classify a destination run by its last element.
///
/// A scalar last element requires every destination to be scalar. A record or record
/// sequence must be the only destination.
///
/// # Errors
/// - [`SqlRowMapError::InvalidArguments`] for an empty run.
/// - [`SqlRowMapError::UnsupportedDestination`] for any mixed run.
pub fn detect_shape(mut dests: Vec<Destination<'_>>) -> Result<DestinationShape<'_>, SqlRowMapError> {
    let last_is_scalar = match dests.last() {
        None => {
            return Err(SqlRowMapError::InvalidArguments(
                "empty destination run".to_string(),
            ));
        }
        Some(dest) => matches!(dest, Destination::Scalar(_)),
    };

    if last_is_scalar {
        return dests
            .into_iter()
            .enumerate()
            .map(|(idx, dest)| match dest {
                Destination::Scalar(slot) => Ok(slot),
                other => Err(SqlRowMapError::UnsupportedDestination(format!(
                    "destination {idx} is a {} but the last destination is a scalar; \
                     scalar destinations cannot be mixed with records",
                    other.kind()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DestinationShape::ScalarList);
    }

    let count = dests.len();
    match dests.pop() {
        Some(dest) if count > 1 => Err(SqlRowMapError::UnsupportedDestination(format!(
            "a {} destination must be the only destination, got {count}",
            dest.kind()
        ))),
        Some(Destination::Record(target)) => Ok(DestinationShape::SingleRecord(target)),
        Some(Destination::Records(sink)) => Ok(DestinationShape::RecordSequence(sink)),
        _ => Err(SqlRowMapError::UnsupportedDestination(
            "unrecognized destination".to_string(),
        )),
    }
}
