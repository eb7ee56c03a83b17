// MySQL backend
//
// - config: connection options with the documented pool defaults
// - params: `RowValues` <-> `mysql_async::Value` conversion
// - executor: SELECT / DML entry points used by the dispatcher

pub mod config;
pub mod executor;
pub mod params;

pub use config::{MysqlOptions, MysqlOptionsBuilder, MysqlProtocol};
pub use executor::{dml, execute_batch, select};
pub use params::{Params, mysql_value_to_row_value};
