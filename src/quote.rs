//! Identifier and literal quoting for PostgreSQL.

use crate::types::SqlValue;

/// Quote a table, column, index or constraint name.
///
/// The name is always wrapped in double quotes, so case is preserved and
/// reserved words are safe. Embedded double quotes are doubled.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a list of identifiers and join them with `", "`.
pub fn quote_idents<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| quote_ident(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quote a string as a SQL literal.
///
/// Single quotes are doubled. Strings containing a backslash use the `E'...'`
/// escape syntax with the backslashes doubled, so the result is the same
/// whatever `standard_conforming_strings` is set to.
pub fn quote_text_literal(value: &str) -> String {
    let escaped = value.replace('\'', "''");
    if escaped.contains('\\') {
        format!("E'{}'", escaped.replace('\\', "\\\\"))
    } else {
        format!("'{}'", escaped)
    }
}

/// Render a value as a SQL literal for direct inclusion in statement text.
pub fn quote_literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(true) => "'t'".to_string(),
        SqlValue::Bool(false) => "'f'".to_string(),
        SqlValue::Int16(i) => i.to_string(),
        SqlValue::Int32(i) => i.to_string(),
        SqlValue::Int64(i) => i.to_string(),
        SqlValue::Float64(f) if f.is_nan() => "'NaN'".to_string(),
        SqlValue::Float64(f) if f.is_infinite() => {
            if f.is_sign_positive() {
                "'Infinity'".to_string()
            } else {
                "'-Infinity'".to_string()
            }
        }
        SqlValue::Float64(f) => f.to_string(),
        SqlValue::Text(s) => quote_text_literal(s),
        SqlValue::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        SqlValue::Time(t) => format!("'{}'", t.format("%H:%M:%S%.f")),
        SqlValue::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
        SqlValue::TimestampTz(ts) => format!("'{}'", ts.to_rfc3339()),
        SqlValue::Json(json) => quote_text_literal(&json.to_string()),
        SqlValue::Uuid(uuid) => format!("'{}'", uuid),
    }
}
