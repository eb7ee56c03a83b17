//! Row-to-destination mapping.
//!
//! - `args`: split call arguments into parameters and destinations
//! - `shape`: pick the mapping strategy from the destinations
//! - `resolver`: build the column-to-field plan for a result set
//! - `row_mapper`: write one row through a plan
//! - `descriptor` / `convert`: record metadata and value conversion

mod args;
mod convert;
mod descriptor;
mod macros;
mod resolver;
mod row_mapper;
mod shape;

pub use args::{Arg, ClassifiedArgs, Destination, classify, classify_trailing};
pub use convert::{FromRowValue, ScalarSlot};
pub use descriptor::{FieldDescriptor, Record, RecordDescriptor};
pub use resolver::{
    ColumnTarget, MappingPlan, MappingStrategy, resolve, resolve_positional, resolve_with,
};
pub use row_mapper::{RecordSink, RecordTarget, map_row, map_row_onto};
pub use shape::{DestinationShape, detect_shape};

pub(crate) use row_mapper::scan_failure;
