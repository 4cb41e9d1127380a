use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::client::DatabaseClient;
use crate::config::ClientOptions;
use crate::error::SqlTemplateError;

use super::query::SqliteDriver;

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    /// File path, or `:memory:` for a private in-memory database.
    pub db_path: String,
    /// Switch the database to write-ahead logging after opening.
    #[serde(default)]
    pub wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            wal: false,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    #[must_use]
    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
    client: ClientOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
            client: ClientOptions::default(),
        }
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn client_options(mut self, client: ClientOptions) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open the connection and wrap it in a client.
    ///
    /// # Errors
    /// Same as [`DatabaseClient::open_sqlite`].
    pub fn build(self) -> Result<DatabaseClient<SqliteDriver>, SqlTemplateError> {
        DatabaseClient::open_sqlite(&self.opts, self.client)
    }
}

impl DatabaseClient<SqliteDriver> {
    #[must_use]
    pub fn sqlite_builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open a `SQLite` database.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ConfigError` for an empty path and
    /// `SqlTemplateError::ExecutionError` if the database cannot be opened.
    pub fn open_sqlite(
        opts: &SqliteOptions,
        client: ClientOptions,
    ) -> Result<Self, SqlTemplateError> {
        if opts.db_path.is_empty() {
            return Err(SqlTemplateError::ConfigError(
                "db_path is required".to_string(),
            ));
        }

        let conn = Connection::open(&opts.db_path)?;
        if opts.wal {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        tracing::debug!(db_path = %opts.db_path, "opened sqlite connection");

        Ok(DatabaseClient::new(SqliteDriver::new(conn), client))
    }
}
