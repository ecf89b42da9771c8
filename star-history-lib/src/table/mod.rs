//! CSV persistence of star history tables
//!
//! A table has a `Month` column followed by one monthly column per repository and then
//! one all-time column per repository. The role of each column is recorded in a
//! [`TableSchema`] saved next to the CSV, so readers never have to guess it from column
//! names. Files written by other tools without a schema fall back to header inference.

mod discovery;
mod reader;
mod schema;
mod writer;

pub use discovery::find_latest;
pub use reader::{LoadedTable, load_history, read_history};
pub use schema::{ALL_TIME_SUFFIX, ColumnKind, ColumnSpec, MONTH_COLUMN, TableSchema};
pub use writer::{save_history, write_history};
