use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use crate::error::SqlTemplateError;

/// Values that can be bound to a placeholder or read back out of a row.
///
/// The set of kinds is closed: a host value enters the system only through one of the `From`
/// conversions below, so anything without a SQL representation is rejected at compile time
/// rather than deep inside binding:
/// ```rust
/// use sql_template::prelude::*;
///
/// let values: Vec<SqlValue> = vec![3.into(), "square".into(), true.into(), None::<i64>.into()];
/// assert!(values[3].is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value
    Null,
    /// Point in time, always UTC
    Timestamp(DateTime<Utc>),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Integer value (64-bit, 32-bit integers are widened)
    Int(i64),
    /// Boolean value
    Bool(bool),
    /// JSON document, positional binding only
    Json(JsonValue),
    /// Binary data, positional binding only
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the value's kind, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Int(_) => "integer",
            SqlValue::Bool(_) => "boolean",
            SqlValue::Json(_) => "json",
            SqlValue::Blob(_) => "blob",
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SqlValue::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            SqlValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Booleans come back from `SQLite` as 0/1 integers, so those are accepted too.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(value) => Some(*value),
            SqlValue::Int(1) => Some(true),
            SqlValue::Int(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(dt.and_utc());
                }
            }
        }
        None
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float(f64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

/// Naive timestamps are taken to be UTC.
impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value.and_utc())
    }
}

impl From<JsonValue> for SqlValue {
    fn from(value: JsonValue) -> Self {
        SqlValue::Json(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Convert a stored [`SqlValue`] back into a host type.
///
/// Used by [`Row::get_as`](crate::results::Row::get_as); returns `None` when the stored kind
/// cannot represent `Self`.
pub trait FromSqlValue: Sized {
    /// Name of the expected kind, used in mismatch errors.
    const EXPECTED: &'static str;

    fn from_sql_value(value: &SqlValue) -> Option<Self>;
}

impl FromSqlValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_int()
    }
}

impl FromSqlValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_int().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromSqlValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromSqlValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromSqlValue for String {
    const EXPECTED: &'static str = "text";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }
}

impl FromSqlValue for DateTime<Utc> {
    const EXPECTED: &'static str = "timestamp";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_timestamp()
    }
}

impl FromSqlValue for JsonValue {
    const EXPECTED: &'static str = "json";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Json(json) => Some(json.clone()),
            SqlValue::Text(text) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }
}

impl FromSqlValue for Vec<u8> {
    const EXPECTED: &'static str = "blob";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        value.as_blob().map(<[u8]>::to_vec)
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_sql_value(value).map(Some)
        }
    }
}

pub(crate) fn convert_column<T: FromSqlValue>(
    column: &str,
    value: &SqlValue,
) -> Result<T, SqlTemplateError> {
    T::from_sql_value(value).ok_or_else(|| SqlTemplateError::TypeMismatch {
        column: column.to_owned(),
        expected: T::EXPECTED,
        actual: value.kind(),
    })
}
