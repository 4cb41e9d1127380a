use thiserror::Error;

/// Errors raised by a database driver while preparing, executing, iterating or
/// finishing a statement.
#[derive(Debug, Error)]
pub enum DriverError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] postgres::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum SqlTemplateError {
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Variable '{name}' not resolved at character {offset}")]
    UnresolvedVariable { name: String, offset: usize },

    #[error("Unused variables: {}", .0.join(", "))]
    UnusedVariables(Vec<String>),

    #[error("Failed to serialise \"{value}\" of type {kind}")]
    UnsupportedType { value: String, kind: &'static str },

    #[error(
        "Column \"{column}\" not found. Available columns are: {}",
        quote_all(.available)
    )]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("Column \"{column}\" holds {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("SQL execution error: {0}")]
    ExecutionError(#[source] DriverError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<DriverError> for SqlTemplateError {
    fn from(err: DriverError) -> Self {
        SqlTemplateError::ExecutionError(err)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for SqlTemplateError {
    fn from(err: rusqlite::Error) -> Self {
        SqlTemplateError::ExecutionError(DriverError::Sqlite(err))
    }
}

#[cfg(feature = "postgres")]
impl From<postgres::Error> for SqlTemplateError {
    fn from(err: postgres::Error) -> Self {
        SqlTemplateError::ExecutionError(DriverError::Postgres(err))
    }
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = SqlTemplateError> = std::result::Result<T, E>;
