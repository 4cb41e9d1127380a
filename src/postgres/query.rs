use chrono::{DateTime, NaiveDateTime, Utc};
use postgres::fallible_iterator::FallibleIterator;
use postgres::types::ToSql;
use postgres::{Client, RowIter};
use serde_json::Value;

use crate::driver::{Driver, RowSource};
use crate::error::DriverError;
use crate::template::PlaceholderStyle;
use crate::types::SqlValue;

use super::params::as_refs;

/// Extracts a `SqlValue` from a `postgres` row at the given index.
///
/// # Errors
/// Returns `postgres::Error` if the column cannot be read as its declared type.
pub fn postgres_extract_value(row: &postgres::Row, idx: usize) -> Result<SqlValue, postgres::Error> {
    let type_name = row.columns()[idx].type_().name();

    let value = match type_name {
        "int2" => row
            .try_get::<_, Option<i16>>(idx)?
            .map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))),
        "int4" => row
            .try_get::<_, Option<i32>>(idx)?
            .map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))),
        "int8" => row
            .try_get::<_, Option<i64>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Int),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)?
            .map_or(SqlValue::Null, |v| SqlValue::Float(f64::from(v))),
        "float8" => row
            .try_get::<_, Option<f64>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Float),
        "bool" => row
            .try_get::<_, Option<bool>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Bool),
        "timestamp" => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map_or(SqlValue::Null, |v| SqlValue::Timestamp(v.and_utc())),
        "timestamptz" => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Timestamp),
        "json" | "jsonb" => row
            .try_get::<_, Option<Value>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Json),
        "bytea" => row
            .try_get::<_, Option<Vec<u8>>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Blob),
        // Everything else is read as text.
        _ => row
            .try_get::<_, Option<String>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Text),
    };
    Ok(value)
}

/// Rows streamed from the server as the cursor advances.
struct PostgresRows<'a> {
    columns: Vec<String>,
    iter: Option<RowIter<'a>>,
}

impl RowSource for PostgresRows<'_> {
    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn advance(&mut self) -> Result<Option<Vec<SqlValue>>, DriverError> {
        let Some(iter) = self.iter.as_mut() else {
            return Ok(None);
        };
        let Some(row) = iter.next()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(self.columns.len());
        for idx in 0..self.columns.len() {
            values.push(postgres_extract_value(&row, idx)?);
        }
        Ok(Some(values))
    }

    fn close(&mut self) {
        self.iter = None;
    }
}

/// [`Driver`] over a single blocking `postgres` client.
pub struct PostgresDriver {
    client: Client,
}

impl PostgresDriver {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Driver for PostgresDriver {
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<Box<dyn RowSource + '_>>, DriverError> {
        let stmt = self.client.prepare(sql)?;
        let columns: Vec<String> = stmt
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        if columns.is_empty() {
            self.client.execute(&stmt, &as_refs(params))?;
            return Ok(None);
        }

        let iter = self
            .client
            .query_raw(&stmt, params.iter().map(|p| p as &dyn ToSql))?;
        Ok(Some(Box::new(PostgresRows {
            columns,
            iter: Some(iter),
        })))
    }

    fn begin(&mut self) -> Result<(), DriverError> {
        self.client.batch_execute("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.client.batch_execute("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.client.batch_execute("ROLLBACK")?;
        Ok(())
    }

    fn close(self) -> Result<(), DriverError> {
        self.client.close()?;
        Ok(())
    }
}
