//! Named-placeholder SQL statements for blocking database drivers.
//!
//! A [`Statement`] pairs a compile-time SQL template such as
//! `SELECT * FROM shapes WHERE sides = :sides` with the values for its placeholders. Binding
//! produces either SQL with positional markers plus an ordered value list (the default, and the
//! only injection-safe option) or legacy SQL with the values rendered inline. Binding fails
//! when a placeholder has no value and when a supplied value is never used.
//!
//! ```rust
//! use sql_template::prelude::*;
//!
//! let stmt = Statement::new("INSERT INTO shapes (sides, regular) VALUES (:sides, :regular)")
//!     .bind("sides", 4)
//!     .bind("regular", true);
//! let parsed = bind_parameterized(&stmt, PlaceholderStyle::Anonymous)?;
//! assert_eq!(parsed.sql, "INSERT INTO shapes (sides, regular) VALUES (?, ?)");
//! assert_eq!(parsed.values, vec![SqlValue::Int(4), SqlValue::Bool(true)]);
//! # Ok::<(), SqlTemplateError>(())
//! ```

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod template;
pub mod transaction;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use client::DatabaseClient;
pub use error::{DriverError, Result, SqlTemplateError};
pub use statement::{ParsedStatement, Statement};
pub use types::SqlValue;
