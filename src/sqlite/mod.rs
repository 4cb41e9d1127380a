// SQLite backend over rusqlite.
//
// - config: connection options and client construction
// - params: parameter conversion between template values and SQLite values
// - query: result extraction and the driver implementation

pub mod config;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use params::Params;
pub use query::{SqliteDriver, SqliteRows};
