//! The boundary between the statement layer and a concrete database driver.

use crate::error::DriverError;
use crate::template::PlaceholderStyle;
use crate::types::SqlValue;

/// A live result set being read by a [`Cursor`](crate::results::Cursor).
pub trait RowSource {
    /// Column names in result order, 0-based.
    fn column_names(&self) -> Vec<String>;

    /// Move to the next row, returning its values or `None` once exhausted.
    ///
    /// # Errors
    /// Returns `DriverError` if the driver fails while fetching the row.
    fn advance(&mut self) -> Result<Option<Vec<SqlValue>>, DriverError>;

    /// Release driver resources; further calls to `advance` return `None`.
    fn close(&mut self) {}
}

/// One driver connection.
///
/// Connections are used from one thread at a time; the statement layer never shares one.
pub trait Driver {
    /// Marker syntax this driver expects for positional parameters.
    fn placeholder_style(&self) -> PlaceholderStyle;

    /// Run `sql` with positional `params`.
    ///
    /// Returns `None` when the statement produced no result set (DDL and DML without
    /// `RETURNING`).
    ///
    /// # Errors
    /// Returns `DriverError` if preparing or executing the statement fails.
    fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<Box<dyn RowSource + '_>>, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the driver rejects `BEGIN`.
    fn begin(&mut self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the commit fails.
    fn commit(&mut self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the rollback fails.
    fn rollback(&mut self) -> Result<(), DriverError>;

    /// Close the underlying connection.
    ///
    /// # Errors
    /// Returns `DriverError` if the driver reports a failure while closing.
    fn close(self) -> Result<(), DriverError>
    where
        Self: Sized;
}

/// A result set already held in memory, for drivers that read their rows up front.
#[derive(Debug, Default)]
pub struct BufferedRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<SqlValue>>,
}

impl BufferedRows {
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }
}

impl RowSource for BufferedRows {
    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn advance(&mut self) -> Result<Option<Vec<SqlValue>>, DriverError> {
        Ok(self.rows.next())
    }

    fn close(&mut self) {
        self.rows = Vec::new().into_iter();
    }
}
