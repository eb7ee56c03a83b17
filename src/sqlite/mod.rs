// SQLite backend
//
// - config: pool options and the bb8 connection manager
// - params: parameter conversion from `RowValues`
// - query: result extraction into a `ResultSet`
// - executor: SELECT / DML entry points used by the dispatcher

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SharedSqliteConnection, SqliteManager, SqliteOptions, SqliteOptionsBuilder};
pub use executor::{dml, execute_batch, select};
pub use params::Params;
pub use query::build_result_set;
