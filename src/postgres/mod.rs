// PostgreSQL backend over the blocking `postgres` client.
//
// - config: connection options and client construction
// - params: `ToSql` for template values
// - query: result extraction and the driver implementation

pub mod config;
pub mod params;
pub mod query;

pub use config::{PostgresOptions, PostgresOptionsBuilder};
pub use query::{PostgresDriver, postgres_extract_value};
