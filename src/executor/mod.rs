mod database;
mod dispatch;
mod limit;

pub use database::{Database, map_result_set};
pub use limit::{has_row_limit, limit_to_one_row};
