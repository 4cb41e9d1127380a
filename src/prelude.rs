//! Convenient imports for common functionality.

pub use crate::client::DatabaseClient;
pub use crate::config::{ClientOptions, DropBehavior};
pub use crate::driver::{BufferedRows, Driver, RowSource};
pub use crate::error::{DriverError, SqlTemplateError};
pub use crate::results::{ColumnIndex, Cursor, Row};
pub use crate::statement::{ParsedStatement, Statement};
pub use crate::template::{
    BindMode, Binder, BoundStatement, PlaceholderStyle, Token, bind_inline, bind_parameterized,
    to_sql_literal, tokenize,
};
pub use crate::transaction::Transaction;
pub use crate::types::{FromSqlValue, SqlValue};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresDriver, PostgresOptions, PostgresOptionsBuilder};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteDriver, SqliteOptions, SqliteOptionsBuilder};
