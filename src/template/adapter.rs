use crate::error::SqlTemplateError;
use crate::types::SqlValue;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Render a value as SQL literal text for inline binding.
///
/// Text is wrapped in single quotes as-is: embedded quotes are NOT escaped. Inline binding is
/// unsafe for any text that did not originate in the program itself; prefer positional binding.
///
/// # Errors
/// Returns `SqlTemplateError::UnsupportedType` for JSON and blob values, which only the driver
/// can bind.
pub fn to_sql_literal(value: &SqlValue) -> Result<String, SqlTemplateError> {
    let literal = match value {
        SqlValue::Null => "NULL".to_owned(),
        SqlValue::Timestamp(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        SqlValue::Float(f) if f.is_nan() => "NULL".to_owned(),
        SqlValue::Float(f) if f.is_infinite() => {
            if f.is_sign_positive() {
                "'Infinity'".to_owned()
            } else {
                "'-Infinity'".to_owned()
            }
        }
        // Debug keeps the fractional part (3.0) and round-trips exactly.
        SqlValue::Float(f) => format!("{f:?}"),
        SqlValue::Text(s) => format!("'{s}'"),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::Bool(true) => "TRUE".to_owned(),
        SqlValue::Bool(false) => "FALSE".to_owned(),
        SqlValue::Json(json) => {
            return Err(SqlTemplateError::UnsupportedType {
                value: json.to_string(),
                kind: value.kind(),
            });
        }
        SqlValue::Blob(bytes) => {
            return Err(SqlTemplateError::UnsupportedType {
                value: format!("{} byte(s)", bytes.len()),
                kind: value.kind(),
            });
        }
    };
    Ok(literal)
}
