use std::fmt;
use std::sync::Arc;

use crate::driver::RowSource;
use crate::error::SqlTemplateError;

use super::row::{ColumnIndex, Row};

/// Forward-only, single-pass view over a result set.
///
/// Rows are built one per advance and not retained. The driver result set is released when
/// the cursor is exhausted, when a fetch fails, on [`Cursor::close`], or on drop, whichever
/// comes first. Closing twice is a no-op.
pub struct Cursor<'conn> {
    source: Option<Box<dyn RowSource + 'conn>>,
    columns: Arc<ColumnIndex>,
}

impl<'conn> Cursor<'conn> {
    /// A cursor for statements that produced no result set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            source: None,
            columns: Arc::new(ColumnIndex::default()),
        }
    }

    pub(crate) fn new(source: Box<dyn RowSource + 'conn>) -> Self {
        let columns = Arc::new(ColumnIndex::new(source.column_names()));
        Self {
            source: Some(source),
            columns,
        }
    }

    /// Move to the next row.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ExecutionError` if the driver fails while fetching; the cursor
    /// is closed afterwards.
    pub fn next_row(&mut self) -> Result<Option<Row>, SqlTemplateError> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        match source.advance() {
            Ok(Some(values)) => Row::new(Arc::clone(&self.columns), values).map(Some),
            Ok(None) => {
                self.close();
                Ok(None)
            }
            Err(err) => {
                self.close();
                Err(err.into())
            }
        }
    }

    /// Column table shared by every row this cursor yields.
    #[must_use]
    pub fn columns(&self) -> &Arc<ColumnIndex> {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Release the driver result set.
    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = Result<Row, SqlTemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("columns", &self.columns.names())
            .field("closed", &self.is_closed())
            .finish()
    }
}
