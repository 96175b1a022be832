use crate::quote::{quote_ident, quote_text_literal};
use crate::type_map::{to_serial_type, to_sql_type};
use crate::types::ColumnAttributes;

/// Builds the column definition used in CREATE TABLE and ALTER TABLE ADD COLUMN.
///
/// A primary key becomes a serial type sized from the declared type and gets
/// `PRIMARY KEY` instead of any default. `auto_increment` on its own has no
/// effect.
pub fn column_clause(column: &ColumnAttributes) -> String {
    let sql_type = if column.primary_key {
        to_serial_type(column.data_type)
    } else {
        to_sql_type(column.data_type)
    };

    let mut sql = format!("{} {}", quote_ident(&column.name), sql_type);
    if !column.allow_null {
        sql.push_str(" NOT NULL");
    }
    if column.primary_key {
        sql.push_str(" PRIMARY KEY");
    } else if let Some(ref default_value) = column.default_value {
        sql.push_str(" DEFAULT ");
        sql.push_str(&quote_text_literal(default_value));
    }
    sql
}

/// Comma-separated column definitions for a CREATE TABLE.
pub fn table_clause(columns: &[ColumnAttributes]) -> String {
    columns
        .iter()
        .map(column_clause)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    #[test]
    fn test_nullable_column() {
        let col = ColumnAttributes::new("comments", DataType::String);
        assert_eq!(column_clause(&col), "\"comments\" character varying (255)");
    }

    #[test]
    fn test_not_null_with_default() {
        let col = ColumnAttributes::new("active", DataType::Boolean)
            .not_null()
            .default_value("true");
        assert_eq!(
            column_clause(&col),
            "\"active\" boolean NOT NULL DEFAULT 'true'"
        );
    }

    #[test]
    fn test_primary_key_overrides_type_and_default() {
        let col = ColumnAttributes::new("id", DataType::Integer)
            .not_null()
            .primary_key()
            .default_value("7");
        assert_eq!(column_clause(&col), "\"id\" serial NOT NULL PRIMARY KEY");
    }

    #[test]
    fn test_primary_key_serial_sizes() {
        let big = ColumnAttributes::new("id", DataType::BigInt).primary_key();
        assert_eq!(column_clause(&big), "\"id\" bigserial PRIMARY KEY");

        let small = ColumnAttributes::new("id", DataType::SmallInt).primary_key();
        assert_eq!(column_clause(&small), "\"id\" smallserial PRIMARY KEY");

        let text = ColumnAttributes::new("id", DataType::Text).primary_key();
        assert_eq!(column_clause(&text), "\"id\" serial PRIMARY KEY");
    }

    #[test]
    fn test_auto_increment_alone_has_no_effect() {
        let col = ColumnAttributes::new("seq", DataType::Integer).auto_increment();
        assert_eq!(column_clause(&col), "\"seq\" integer");
    }

    #[test]
    fn test_default_is_quoted_as_literal() {
        let col = ColumnAttributes::new("note", DataType::Text).default_value("it's");
        assert_eq!(column_clause(&col), "\"note\" text DEFAULT 'it''s'");
    }

    #[test]
    fn test_table_clause_joins_columns() {
        let cols = vec![
            ColumnAttributes::new("id", DataType::Integer).primary_key(),
            ColumnAttributes::new("order", DataType::Integer).not_null(),
        ];
        assert_eq!(
            table_clause(&cols),
            "\"id\" serial PRIMARY KEY, \"order\" integer NOT NULL"
        );
    }
}
