use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SqlTemplateError;
use crate::types::{FromSqlValue, SqlValue, convert_column};

/// Column name to position table for one result set.
///
/// Built once per query and shared by every [`Row`] of that result set. Names are
/// case-sensitive; when a name repeats, the first column with it wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { names, positions }
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Column names in result-set order, duplicates included.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A single row of a result set, treated as a map from column names to values.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<ColumnIndex>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Pair a shared column table with one row of values.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ExecutionError` if the driver produced a different number of
    /// values than there are columns.
    pub fn new(columns: Arc<ColumnIndex>, values: Vec<SqlValue>) -> Result<Self, SqlTemplateError> {
        if columns.len() != values.len() {
            return Err(crate::error::DriverError::Other(format!(
                "row has {} value(s) for {} column(s)",
                values.len(),
                columns.len()
            ))
            .into());
        }
        Ok(Self { columns, values })
    }

    /// Look up a value by column name.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ColumnNotFound` listing every available column.
    pub fn get(&self, column_name: &str) -> Result<&SqlValue, SqlTemplateError> {
        self.columns
            .position(column_name)
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| SqlTemplateError::ColumnNotFound {
                column: column_name.to_owned(),
                available: self.columns.names().to_vec(),
            })
    }

    /// Look up a value by column name and convert it to a host type.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use sql_template::prelude::*;
    /// let columns = Arc::new(ColumnIndex::new(["sides", "name"]));
    /// let row = Row::new(columns, vec![SqlValue::Int(4), SqlValue::Null])?;
    /// let sides: i64 = row.get_as("sides")?;
    /// let name: Option<String> = row.get_as("name")?;
    /// assert_eq!((sides, name), (4, None));
    /// # Ok::<(), SqlTemplateError>(())
    /// ```
    ///
    /// # Errors
    /// Returns `ColumnNotFound` for an unknown column and `TypeMismatch` when the stored kind
    /// cannot be converted to `T`.
    pub fn get_as<T: FromSqlValue>(&self, column_name: &str) -> Result<T, SqlTemplateError> {
        convert_column(column_name, self.get(column_name)?)
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}
