use rusqlite::types::Value;
use rusqlite::{Connection, Rows, Statement};
use self_cell::self_cell;

use crate::driver::{Driver, RowSource};
use crate::error::DriverError;
use crate::template::PlaceholderStyle;
use crate::types::SqlValue;

use super::params::Params;

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, rusqlite::Error> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

type LiveRows<'stmt> = Rows<'stmt>;

self_cell!(
    /// A prepared statement together with the rows it is stepping through.
    struct StatementRows<'conn> {
        owner: Statement<'conn>,

        #[not_covariant]
        dependent: LiveRows,
    }
);

/// Lazy result set over a prepared `SQLite` statement.
///
/// Each [`RowSource::advance`] steps the statement once, so a failure on a later row surfaces
/// only when that row is reached.
pub struct SqliteRows<'conn> {
    columns: Vec<String>,
    rows: Option<StatementRows<'conn>>,
}

impl<'conn> SqliteRows<'conn> {
    /// Bind `params` to `stmt` and start stepping it.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the parameter count does not match or a value cannot be
    /// bound.
    pub fn start(mut stmt: Statement<'conn>, params: &[Value]) -> Result<Self, rusqlite::Error> {
        let expected = stmt.parameter_count();
        if expected != params.len() {
            return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected));
        }
        for (idx, value) in params.iter().enumerate() {
            stmt.raw_bind_parameter(idx + 1, value)?;
        }

        let columns = stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();
        let rows = StatementRows::new(stmt, |stmt| stmt.raw_query());
        Ok(Self {
            columns,
            rows: Some(rows),
        })
    }
}

impl RowSource for SqliteRows<'_> {
    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn advance(&mut self) -> Result<Option<Vec<SqlValue>>, DriverError> {
        let width = self.columns.len();
        let Some(rows) = self.rows.as_mut() else {
            return Ok(None);
        };

        let next = rows.with_dependent_mut(|_, rows| -> Result<_, rusqlite::Error> {
            match rows.next()? {
                Some(row) => (0..width)
                    .map(|idx| sqlite_extract_value(row, idx))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Some),
                None => Ok(None),
            }
        })?;
        Ok(next)
    }

    fn close(&mut self) {
        self.rows = None;
    }
}

/// [`Driver`] over a single rusqlite connection.
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Driver for SqliteDriver {
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Anonymous
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<Box<dyn RowSource + '_>>, DriverError> {
        let converted = Params::convert(params);
        let mut stmt = self.conn.prepare(sql)?;

        if stmt.column_count() == 0 {
            stmt.execute(&converted.as_refs()[..])?;
            return Ok(None);
        }

        let rows = SqliteRows::start(stmt, converted.as_values())?;
        Ok(Some(Box::new(rows)))
    }

    fn begin(&mut self) -> Result<(), DriverError> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn close(self) -> Result<(), DriverError> {
        self.conn.close().map_err(|(_, err)| DriverError::Sqlite(err))
    }
}
