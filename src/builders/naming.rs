//! Default names for constraints and indexes.
//!
//! The names are returned unquoted so callers can pass them back to the drop
//! operations.

/// `<table>_<column>_fkey`
pub fn foreign_key_name(table: &str, column: &str) -> String {
    [table, column, "fkey"].join("_")
}

/// `<table>_<column1>[_<column2>...]_idx`
pub fn index_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let mut parts = Vec::with_capacity(columns.len() + 2);
    parts.push(table);
    parts.extend(columns.iter().map(|c| c.as_ref()));
    parts.push("idx");
    parts.join("_")
}
