use crate::client::DatabaseClient;
use crate::config::DropBehavior;
use crate::driver::Driver;
use crate::error::SqlTemplateError;
use crate::results::Cursor;
use crate::statement::Statement;

/// A group of statements that take effect together.
///
/// The transaction borrows its client mutably for its whole life. [`Transaction::commit`] and
/// [`Transaction::rollback`] consume it, so it can be finished only once. A transaction
/// released without either follows [`ClientOptions::on_drop`](crate::config::ClientOptions):
/// commit by default, or rollback when configured.
pub struct Transaction<'c, D: Driver> {
    client: &'c mut DatabaseClient<D>,
    finished: bool,
}

impl<'c, D: Driver> Transaction<'c, D> {
    pub(crate) fn begin(client: &'c mut DatabaseClient<D>) -> Result<Self, SqlTemplateError> {
        client.driver_mut().begin()?;
        tracing::debug!("transaction started");
        Ok(Self {
            client,
            finished: false,
        })
    }

    /// Run a statement inside the transaction, discarding any rows.
    ///
    /// # Errors
    /// Same as [`DatabaseClient::execute`].
    pub fn execute(&mut self, statement: &Statement) -> Result<(), SqlTemplateError> {
        self.client.execute(statement)
    }

    /// Run a statement inside the transaction and read its rows.
    ///
    /// # Errors
    /// Same as [`DatabaseClient::execute_statement`].
    pub fn query(&mut self, statement: &Statement) -> Result<Cursor<'_>, SqlTemplateError> {
        self.client.execute_statement(statement)
    }

    /// Make every statement run in this transaction permanent.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ExecutionError` if the driver commit fails. The transaction is
    /// then released according to the drop behavior.
    pub fn commit(mut self) -> Result<(), SqlTemplateError> {
        self.client.driver_mut().commit()?;
        self.finished = true;
        tracing::debug!("transaction committed");
        Ok(())
    }

    /// Discard every statement run in this transaction.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ExecutionError` if the driver rollback fails.
    pub fn rollback(mut self) -> Result<(), SqlTemplateError> {
        self.finished = true;
        self.client.driver_mut().rollback()?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }
}

impl<D: Driver> Drop for Transaction<'_, D> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let behavior = self.client.options().on_drop;
        let driver = self.client.driver_mut();
        let outcome = match behavior {
            DropBehavior::Rollback => driver.rollback(),
            DropBehavior::Commit => driver.commit(),
        };
        if let Err(err) = outcome {
            tracing::warn!(?behavior, error = %err, "failed to release transaction");
        }
    }
}
