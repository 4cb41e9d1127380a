use postgres::{Config, NoTls};
use serde::{Deserialize, Serialize};

use crate::client::DatabaseClient;
use crate::config::ClientOptions;
use crate::error::SqlTemplateError;

use super::query::PostgresDriver;

/// Connection options for a `PostgreSQL` server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresOptions {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Database name; the server defaults it to the user name when absent.
    #[serde(default)]
    pub dbname: Option<String>,
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

impl PostgresOptions {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            user: default_user(),
            password: None,
            dbname: None,
        }
    }

    /// Check required fields.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), SqlTemplateError> {
        if self.host.is_empty() {
            return Err(SqlTemplateError::ConfigError("host is required".to_string()));
        }
        if self.port == 0 {
            return Err(SqlTemplateError::ConfigError("port is required".to_string()));
        }
        if self.user.is_empty() {
            return Err(SqlTemplateError::ConfigError("user is required".to_string()));
        }
        Ok(())
    }

    fn to_config(&self) -> Config {
        let mut cfg = Config::new();
        cfg.host(&self.host).port(self.port).user(&self.user);
        if let Some(password) = &self.password {
            cfg.password(password);
        }
        if let Some(dbname) = &self.dbname {
            cfg.dbname(dbname);
        }
        cfg
    }
}

/// Fluent builder for `PostgreSQL` options.
#[derive(Debug, Clone)]
pub struct PostgresOptionsBuilder {
    opts: PostgresOptions,
    client: ClientOptions,
}

impl PostgresOptionsBuilder {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            opts: PostgresOptions::new(host, port),
            client: ClientOptions::default(),
        }
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.opts.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.opts.dbname = Some(dbname.into());
        self
    }

    #[must_use]
    pub fn client_options(mut self, client: ClientOptions) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn finish(self) -> PostgresOptions {
        self.opts
    }

    /// Connect and wrap the connection in a client.
    ///
    /// # Errors
    /// Same as [`DatabaseClient::connect_postgres`].
    pub fn build(self) -> Result<DatabaseClient<PostgresDriver>, SqlTemplateError> {
        DatabaseClient::connect_postgres(&self.opts, self.client)
    }
}

impl DatabaseClient<PostgresDriver> {
    #[must_use]
    pub fn postgres_builder(host: impl Into<String>, port: u16) -> PostgresOptionsBuilder {
        PostgresOptionsBuilder::new(host, port)
    }

    /// Connect to a `PostgreSQL` server without TLS.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ConfigError` for missing fields and
    /// `SqlTemplateError::ExecutionError` if the connection fails.
    pub fn connect_postgres(
        opts: &PostgresOptions,
        client: ClientOptions,
    ) -> Result<Self, SqlTemplateError> {
        opts.validate()?;
        let conn = opts.to_config().connect(NoTls)?;
        tracing::debug!(host = %opts.host, port = opts.port, "connected to postgres");
        Ok(DatabaseClient::new(PostgresDriver::new(conn), client))
    }
}
