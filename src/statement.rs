use std::collections::BTreeMap;
use std::fmt;

use crate::types::SqlValue;

/// A SQL template with zero or more `:name` placeholders and the values to bind to them.
///
/// The template must be a compile-time constant. Binding never interprets the SQL grammar, so
/// building a template from untrusted input defeats the placeholder mechanism entirely:
/// ```rust
/// use sql_template::prelude::*;
///
/// let stmt = Statement::new("INSERT INTO shapes (sides,regular) VALUES (:sides,:regular)")
///     .bind("sides", 3)
///     .bind("regular", false);
/// assert_eq!(stmt.variables().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    template: String,
    variables: BTreeMap<String, Option<SqlValue>>,
}

impl Statement {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: BTreeMap::new(),
        }
    }

    /// Build a statement from an existing variable map.
    pub fn with_variables<K, V, I>(template: impl Into<String>, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        let variables = variables
            .into_iter()
            .map(|(name, value)| (name.into(), Some(value.into())))
            .collect();
        Self {
            template: template.into(),
            variables,
        }
    }

    /// Bind a value to the placeholder `:name`, replacing any earlier binding.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.variables.insert(name.into(), Some(value.into()));
        self
    }

    /// Declare `name` without a value.
    ///
    /// The name counts as supplied for the unused-variable check but binding fails with
    /// `UnresolvedVariable` if the template references it. Bind [`SqlValue::Null`] to send NULL.
    #[must_use]
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.variables.insert(name.into(), None);
        self
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn variables(&self) -> &BTreeMap<String, Option<SqlValue>> {
        &self.variables
    }

    /// Look up a bound value; `None` covers both a missing name and a declared-only name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&SqlValue> {
        self.variables.get(name).and_then(Option::as_ref)
    }
}

/// SQL with positional markers plus the values for those markers, in marker order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl ParsedStatement {
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

impl fmt::Display for ParsedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} value(s)", self.sql, self.values.len())
    }
}
