use crate::config::ClientOptions;
use crate::driver::Driver;
use crate::error::SqlTemplateError;
use crate::results::Cursor;
use crate::statement::Statement;
use crate::template::{Binder, BoundStatement};
use crate::transaction::Transaction;

/// Sends bound statements to one driver connection and wraps what comes back.
///
/// A client owns exactly one connection and is not meant to be shared between threads; use
/// one client per thread. Cursors and transactions borrow the client mutably, so only one of
/// them can be live at a time.
pub struct DatabaseClient<D: Driver> {
    driver: D,
    options: ClientOptions,
    binder: Binder,
}

impl<D: Driver> DatabaseClient<D> {
    pub fn new(driver: D, options: ClientOptions) -> Self {
        let binder = Binder::new(options.bind_mode, driver.placeholder_style());
        Self {
            driver,
            options,
            binder,
        }
    }

    #[must_use]
    pub fn options(&self) -> ClientOptions {
        self.options
    }

    #[must_use]
    pub fn binder(&self) -> Binder {
        self.binder
    }

    /// Bind and run a statement.
    ///
    /// Returns a cursor over the result set, or an empty cursor when the statement produced
    /// none.
    ///
    /// # Errors
    /// Returns the binding errors of [`Binder::bind`], or `SqlTemplateError::ExecutionError`
    /// wrapping the driver's failure.
    pub fn execute_statement(
        &mut self,
        statement: &Statement,
    ) -> Result<Cursor<'_>, SqlTemplateError> {
        let bound = self.binder.bind(statement)?;
        log_running(&bound);

        let source = self.driver.execute(bound.sql(), bound.values())?;
        Ok(source.map_or_else(Cursor::empty, Cursor::new))
    }

    /// Bind and run a statement, discarding any rows.
    ///
    /// # Errors
    /// Same as [`DatabaseClient::execute_statement`].
    pub fn execute(&mut self, statement: &Statement) -> Result<(), SqlTemplateError> {
        let mut cursor = self.execute_statement(statement)?;
        cursor.close();
        Ok(())
    }

    /// Open a transaction on this connection.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ExecutionError` if the driver cannot begin a transaction.
    pub fn begin(&mut self) -> Result<Transaction<'_, D>, SqlTemplateError> {
        Transaction::begin(self)
    }

    /// Close the underlying connection.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ExecutionError` if the driver fails to close cleanly.
    pub fn close(self) -> Result<(), SqlTemplateError> {
        self.driver.close()?;
        Ok(())
    }

    pub(crate) fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

fn log_running(bound: &BoundStatement) {
    match bound {
        BoundStatement::Inline(sql) => tracing::info!(%sql, "running inline statement"),
        BoundStatement::Parameterized(parsed) => {
            tracing::info!(sql = %parsed.sql, values = parsed.values.len(), "running statement");
        }
    }
}
