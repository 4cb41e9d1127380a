//! Named-placeholder templating.
//!
//! A template such as `INSERT INTO shapes (sides) VALUES (:sides)` is scanned once into
//! [`Token`]s, then folded either into inline SQL literal text or into SQL with positional
//! markers plus an ordered value list. Both folds fail on a placeholder with no bound value
//! and on a bound value no placeholder uses.

mod adapter;
mod scanner;

use std::collections::BTreeSet;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::SqlTemplateError;
use crate::statement::{ParsedStatement, Statement};
use crate::types::SqlValue;

pub use adapter::to_sql_literal;

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// SQL text passed through untouched.
    Literal(String),
    /// A `:name` placeholder; `offset` is the character index of the `:`.
    Placeholder { name: String, offset: usize },
}

impl Token {
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Token::Literal(text.into())
    }

    #[must_use]
    pub fn placeholder(name: impl Into<String>, offset: usize) -> Self {
        Token::Placeholder {
            name: name.into(),
            offset,
        }
    }
}

/// Split a template into literal and placeholder tokens.
///
/// Never fails: any character outside `[A-Za-z0-9_]` simply ends a placeholder.
#[must_use]
pub fn tokenize(template: &str) -> Vec<Token> {
    scanner::scan(template)
}

/// How values reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindMode {
    /// Render values into the SQL text. Legacy: text is not escaped.
    Inline,
    /// Emit positional markers and hand the values to the driver.
    #[default]
    Parameterized,
}

/// Positional marker syntax for parameterized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// Bare `?` markers.
    #[default]
    Anonymous,
    /// SQLite-style numbered markers like `?1`.
    Numbered,
    /// PostgreSQL-style markers like `$1`.
    Dollar,
}

impl PlaceholderStyle {
    fn push_marker(self, sql: &mut String, position: usize) {
        // Writing into a String cannot fail.
        let _ = match self {
            PlaceholderStyle::Anonymous => write!(sql, "?"),
            PlaceholderStyle::Numbered => write!(sql, "?{position}"),
            PlaceholderStyle::Dollar => write!(sql, "${position}"),
        };
    }
}

/// Output of [`Binder::bind`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundStatement {
    Inline(String),
    Parameterized(ParsedStatement),
}

impl BoundStatement {
    #[must_use]
    pub fn sql(&self) -> &str {
        match self {
            BoundStatement::Inline(sql) => sql,
            BoundStatement::Parameterized(parsed) => &parsed.sql,
        }
    }

    /// Values for the positional markers; always empty for inline SQL.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        match self {
            BoundStatement::Inline(_) => &[],
            BoundStatement::Parameterized(parsed) => &parsed.values,
        }
    }
}

/// Selects one of the two folds over a shared tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Binder {
    mode: BindMode,
    style: PlaceholderStyle,
}

impl Binder {
    #[must_use]
    pub fn new(mode: BindMode, style: PlaceholderStyle) -> Self {
        Self { mode, style }
    }

    #[must_use]
    pub fn inline() -> Self {
        Self::new(BindMode::Inline, PlaceholderStyle::default())
    }

    #[must_use]
    pub fn parameterized(style: PlaceholderStyle) -> Self {
        Self::new(BindMode::Parameterized, style)
    }

    #[must_use]
    pub fn mode(&self) -> BindMode {
        self.mode
    }

    /// Bind the statement's variables to its template.
    ///
    /// # Errors
    /// See [`bind_inline`] and [`bind_parameterized`].
    pub fn bind(&self, statement: &Statement) -> Result<BoundStatement, SqlTemplateError> {
        match self.mode {
            BindMode::Inline => bind_inline(statement).map(BoundStatement::Inline),
            BindMode::Parameterized => {
                bind_parameterized(statement, self.style).map(BoundStatement::Parameterized)
            }
        }
    }
}

/// Substitute every placeholder with the SQL literal form of its value.
///
/// # Errors
/// Returns `UnresolvedVariable` for the first placeholder without a value,
/// `UnsupportedType` for values with no literal form, and `UnusedVariables` when the statement
/// supplies names the template never references.
pub fn bind_inline(statement: &Statement) -> Result<String, SqlTemplateError> {
    let tokens = tokenize(statement.template());
    let mut sql = String::with_capacity(statement.template().len());

    for token in &tokens {
        match token {
            Token::Literal(text) => sql.push_str(text),
            Token::Placeholder { name, offset } => {
                let value = resolve(statement, name, *offset)?;
                sql.push_str(&to_sql_literal(value)?);
            }
        }
    }

    check_all_variables_used(statement, &tokens)?;
    tracing::debug!(tokens = tokens.len(), "bound inline statement");
    Ok(sql)
}

/// Replace every placeholder with a positional marker and collect the values in marker order.
///
/// # Errors
/// Returns `InvalidTemplate` if the template already contains `?`, then the same resolution
/// errors as [`bind_inline`] (apart from `UnsupportedType`, since values are not rendered).
pub fn bind_parameterized(
    statement: &Statement,
    style: PlaceholderStyle,
) -> Result<ParsedStatement, SqlTemplateError> {
    let template = statement.template();
    if let Some(offset) = scanner::find_positional_marker(template) {
        return Err(SqlTemplateError::InvalidTemplate(format!(
            "'{}' at character {offset} is reserved for positional parameters",
            scanner::POSITIONAL_MARKER
        )));
    }

    let tokens = tokenize(template);
    let mut sql = String::with_capacity(template.len());
    let mut values = Vec::new();

    for token in &tokens {
        match token {
            Token::Literal(text) => sql.push_str(text),
            Token::Placeholder { name, offset } => {
                let value = resolve(statement, name, *offset)?;
                values.push(value.clone());
                style.push_marker(&mut sql, values.len());
            }
        }
    }

    check_all_variables_used(statement, &tokens)?;
    tracing::debug!(
        tokens = tokens.len(),
        values = values.len(),
        "bound parameterized statement"
    );
    Ok(ParsedStatement { sql, values })
}

fn resolve<'s>(
    statement: &'s Statement,
    name: &str,
    offset: usize,
) -> Result<&'s SqlValue, SqlTemplateError> {
    statement
        .value(name)
        .ok_or_else(|| SqlTemplateError::UnresolvedVariable {
            name: name.to_owned(),
            offset,
        })
}

// Runs after the fold has built the SQL.
fn check_all_variables_used(
    statement: &Statement,
    tokens: &[Token],
) -> Result<(), SqlTemplateError> {
    let used: BTreeSet<&str> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Placeholder { name, .. } => Some(name.as_str()),
            Token::Literal(_) => None,
        })
        .collect();

    let unused: Vec<String> = statement
        .variables()
        .keys()
        .filter(|name| !used.contains(name.as_str()))
        .cloned()
        .collect();

    if unused.is_empty() {
        Ok(())
    } else {
        Err(SqlTemplateError::UnusedVariables(unused))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = "INSERT INTO shapes (sides,regular,convex) VALUES (:sides,:regular,:convex)";

    #[test]
    fn tokenizes_single_placeholder() {
        assert_eq!(
            tokenize("INSERT INTO shapes (sides) VALUES (:sides)"),
            vec![
                Token::literal("INSERT INTO shapes (sides) VALUES ("),
                Token::placeholder("sides", 35),
                Token::literal(")"),
            ]
        );
    }

    #[test]
    fn tokenizes_multiple_placeholders() {
        assert_eq!(
            tokenize("INSERT INTO shapes (sides,regular) VALUES (:sides,:regular)"),
            vec![
                Token::literal("INSERT INTO shapes (sides,regular) VALUES ("),
                Token::placeholder("sides", 43),
                Token::literal(","),
                Token::placeholder("regular", 50),
                Token::literal(")"),
            ]
        );
    }

    #[test]
    fn adjacent_placeholders_have_no_literal_between() {
        assert_eq!(
            tokenize("sql:sides:regular"),
            vec![
                Token::literal("sql"),
                Token::placeholder("sides", 3),
                Token::placeholder("regular", 9),
            ]
        );
    }

    #[test]
    fn names_allow_digits_and_underscores() {
        assert_eq!(
            tokenize(":sides_are_great123"),
            vec![Token::placeholder("sides_are_great123", 0)]
        );
    }

    #[test]
    fn empty_template_has_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn bare_marker_stays_literal() {
        assert_eq!(
            tokenize("SELECT ': ' || :x:"),
            vec![
                Token::literal("SELECT ': ' || "),
                Token::placeholder("x", 15),
                Token::literal(":"),
            ]
        );
    }

    #[test]
    fn offsets_count_characters() {
        assert_eq!(
            tokenize("é:a"),
            vec![Token::literal("é"), Token::placeholder("a", 1)]
        );
    }

    #[test]
    fn no_placeholders_returns_template() {
        let stmt = Statement::new("SELECT * FROM shapes");
        assert_eq!(bind_inline(&stmt).unwrap(), "SELECT * FROM shapes");
        let parsed = bind_parameterized(&stmt, PlaceholderStyle::Anonymous).unwrap();
        assert_eq!(parsed.sql, "SELECT * FROM shapes");
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn inlines_numeric_and_text() {
        let tpl = "INSERT INTO shapes (sides) VALUES (:sides)";
        let stmt = Statement::new(tpl).bind("sides", 3);
        assert_eq!(bind_inline(&stmt).unwrap(), "INSERT INTO shapes (sides) VALUES (3)");
        let stmt = Statement::new(tpl).bind("sides", "3");
        assert_eq!(bind_inline(&stmt).unwrap(), "INSERT INTO shapes (sides) VALUES ('3')");
    }

    #[test]
    fn inlines_multiple_placeholders() {
        let stmt = Statement::new(SHAPES)
            .bind("sides", "3")
            .bind("regular", false)
            .bind("convex", true);
        assert_eq!(
            bind_inline(&stmt).unwrap(),
            "INSERT INTO shapes (sides,regular,convex) VALUES ('3',FALSE,TRUE)"
        );
    }

    #[test]
    fn missing_variable_is_unresolved() {
        let stmt = Statement::new(SHAPES).bind("sides", "3").bind("convex", true);
        let err = bind_inline(&stmt).unwrap_err();
        match err {
            SqlTemplateError::UnresolvedVariable { name, offset } => {
                assert_eq!(name, "regular");
                assert_eq!(offset, 57);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn declared_but_unset_variable_is_unresolved() {
        let stmt = Statement::new(SHAPES)
            .bind("sides", "3")
            .declare("regular")
            .bind("convex", true);
        assert!(matches!(
            bind_parameterized(&stmt, PlaceholderStyle::Anonymous),
            Err(SqlTemplateError::UnresolvedVariable { .. })
        ));
    }

    #[test]
    fn extra_variable_is_unused() {
        let stmt = Statement::new(SHAPES)
            .bind("sides", "3")
            .bind("convex", true)
            .bind("regular", false)
            .bind("not_used_in_statement", "not_used");
        match bind_inline(&stmt).unwrap_err() {
            SqlTemplateError::UnusedVariables(names) => {
                assert_eq!(names, vec!["not_used_in_statement".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn every_unused_variable_is_listed_sorted() {
        let stmt = Statement::new(SHAPES)
            .bind("sides", 3)
            .bind("convex", true)
            .bind("regular", false)
            .bind("zorder", 1)
            .bind("colour", "red");
        for result in [
            bind_inline(&stmt).map(|_| ()),
            bind_parameterized(&stmt, PlaceholderStyle::Dollar).map(|_| ()),
        ] {
            match result.unwrap_err() {
                SqlTemplateError::UnusedVariables(names) => {
                    assert_eq!(names, vec!["colour".to_string(), "zorder".to_string()]);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn unresolved_wins_over_unused() {
        let stmt = Statement::new(SHAPES)
            .bind("sides", "3")
            .bind("convex", true)
            .bind("extra", 1);
        assert!(matches!(
            bind_inline(&stmt),
            Err(SqlTemplateError::UnresolvedVariable { .. })
        ));
    }

    #[test]
    fn parameterized_collects_values_in_order() {
        let stmt = Statement::new(SHAPES)
            .bind("convex", true)
            .bind("sides", 3)
            .bind("regular", false);
        let parsed = bind_parameterized(&stmt, PlaceholderStyle::Anonymous).unwrap();
        assert_eq!(
            parsed.sql,
            "INSERT INTO shapes (sides,regular,convex) VALUES (?,?,?)"
        );
        assert_eq!(
            parsed.values,
            vec![SqlValue::Int(3), SqlValue::Bool(false), SqlValue::Bool(true)]
        );
    }

    #[test]
    fn repeated_placeholder_binds_once_per_occurrence() {
        let stmt = Statement::new("SELECT * FROM t WHERE a = :v OR b = :v").bind("v", 9);
        let parsed = bind_parameterized(&stmt, PlaceholderStyle::Dollar).unwrap();
        assert_eq!(parsed.sql, "SELECT * FROM t WHERE a = $1 OR b = $2");
        assert_eq!(parsed.values.len(), 2);
    }

    #[test]
    fn numbered_markers() {
        let stmt = Statement::new("VALUES (:a,:b)").bind("a", 1).bind("b", 2);
        let parsed = bind_parameterized(&stmt, PlaceholderStyle::Numbered).unwrap();
        assert_eq!(parsed.sql, "VALUES (?1,?2)");
    }

    #[test]
    fn parameterized_rejects_question_mark() {
        let stmt = Statement::new("SELECT '?' , :a").bind("a", 1);
        match bind_parameterized(&stmt, PlaceholderStyle::Anonymous).unwrap_err() {
            SqlTemplateError::InvalidTemplate(msg) => assert!(msg.contains("character 8")),
            other => panic!("unexpected error: {other:?}"),
        }
        // Inline output has no positional markers, so `?` is harmless there.
        assert_eq!(bind_inline(&stmt).unwrap(), "SELECT '?' , 1");
    }

    #[test]
    fn parameterized_passes_values_through_unrendered() {
        let stmt = Statement::new("INSERT INTO docs (body) VALUES (:body)")
            .bind("body", serde_json::json!({"sides": 4}));
        let parsed = bind_parameterized(&stmt, PlaceholderStyle::Anonymous).unwrap();
        assert!(matches!(parsed.values[0], SqlValue::Json(_)));
        assert!(matches!(
            bind_inline(&stmt),
            Err(SqlTemplateError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn marker_count_matches_placeholder_count() {
        let templates = [
            "",
            ":a",
            "x:a:b:c",
            "SELECT :a, :b FROM t WHERE c = :a",
            "no placeholders here",
        ];
        for tpl in templates {
            let mut stmt = Statement::new(tpl);
            for token in tokenize(tpl) {
                if let Token::Placeholder { name, .. } = token {
                    stmt = stmt.bind(name, 1);
                }
            }
            let placeholders = tokenize(tpl)
                .iter()
                .filter(|t| matches!(t, Token::Placeholder { .. }))
                .count();
            let parsed = bind_parameterized(&stmt, PlaceholderStyle::Anonymous).unwrap();
            assert_eq!(parsed.values.len(), placeholders, "{tpl}");
            assert_eq!(parsed.sql.matches('?').count(), placeholders, "{tpl}");
        }
    }

    #[test]
    fn binder_dispatches_on_mode() {
        let stmt = Statement::new("SELECT :a").bind("a", 1);
        let inline = Binder::inline().bind(&stmt).unwrap();
        assert_eq!(inline.sql(), "SELECT 1");
        assert!(inline.values().is_empty());
        let positional = Binder::parameterized(PlaceholderStyle::Dollar)
            .bind(&stmt)
            .unwrap();
        assert_eq!(positional.sql(), "SELECT $1");
        assert_eq!(positional.values(), &[SqlValue::Int(1)]);
    }
}
