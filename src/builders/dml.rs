//! Row statements: select, insert, update, delete and truncate.
//!
//! WHERE values are always bound as parameters. Insert and update payloads are
//! written as literals so the server can coerce them to each column's type.

use crate::builders::Statement;
use crate::quote::{quote_ident, quote_idents, quote_literal};
use crate::types::{DataObject, SelectCriteria, WhereCriteria};

pub fn delete(table: &str, criteria: &WhereCriteria) -> Statement {
    Statement::with_params(
        format!("DELETE FROM {} WHERE {}", quote_ident(table), criteria.clause),
        criteria.values.clone(),
    )
}

/// A single-row INSERT. Columns are emitted in key order.
pub fn insert(table: &str, row: &DataObject) -> Statement {
    if row.is_empty() {
        return Statement::text(format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table)));
    }
    let columns: Vec<&str> = row.keys().map(String::as_str).collect();
    let values = row.values().map(quote_literal).collect::<Vec<_>>().join(", ");
    Statement::text(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        quote_idents(columns.as_slice()),
        values
    ))
}

pub fn select(table: &str, criteria: &SelectCriteria) -> Statement {
    let mut sql = String::with_capacity(256);
    let mut params = Vec::new();

    // SELECT clause
    sql.push_str("SELECT ");
    if criteria.columns.is_empty() {
        sql.push('*');
    } else {
        sql.push_str(&quote_idents(criteria.columns.as_slice()));
    }

    // FROM clause
    sql.push_str(" FROM ");
    sql.push_str(&quote_ident(table));

    // WHERE clause
    if let Some(ref where_criteria) = criteria.where_criteria {
        if !where_criteria.clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_criteria.clause);
            params.extend(where_criteria.values.iter().cloned());
        }
    }

    // ORDER BY clause
    if !criteria.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&quote_idents(criteria.order_by.as_slice()));
    }

    // LIMIT / OFFSET
    if let Some(limit) = criteria.limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&limit.to_string());
    }
    if let Some(offset) = criteria.offset {
        sql.push_str(" OFFSET ");
        sql.push_str(&offset.to_string());
    }

    Statement::with_params(sql, params)
}

pub fn truncate(table: &str) -> Statement {
    Statement::text(format!("TRUNCATE {}", quote_ident(table)))
}

pub fn update(table: &str, values: &DataObject, criteria: &WhereCriteria) -> Statement {
    let assignments = values
        .iter()
        .map(|(column, value)| format!("{} = {}", quote_ident(column), quote_literal(value)))
        .collect::<Vec<_>>()
        .join(", ");
    Statement::with_params(
        format!(
            "UPDATE {} SET {} WHERE {}",
            quote_ident(table),
            assignments,
            criteria.clause
        ),
        criteria.values.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SqlValue;

    fn row(pairs: &[(&str, SqlValue)]) -> DataObject {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_delete_binds_where_values() {
        let criteria = WhereCriteria::new("last_name = $1").bind("Rubble");
        let stmt = delete("people", &criteria);
        assert_eq!(stmt.sql, "DELETE FROM \"people\" WHERE last_name = $1");
        assert_eq!(stmt.params, vec![SqlValue::from("Rubble")]);
    }

    #[test]
    fn test_insert_quotes_columns_and_literals() {
        let data = row(&[
            ("first_name", SqlValue::from("Bam Bam")),
            ("active", SqlValue::Bool(false)),
            ("order", SqlValue::Int32(3)),
            ("comments", SqlValue::Null),
        ]);
        let stmt = insert("people", &data);
        assert_eq!(
            stmt.sql,
            "INSERT INTO \"people\" (\"active\", \"comments\", \"first_name\", \"order\") \
             VALUES ('f', NULL, 'Bam Bam', 3)"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_insert_empty_row_uses_defaults() {
        let stmt = insert("people", &DataObject::new());
        assert_eq!(stmt.sql, "INSERT INTO \"people\" DEFAULT VALUES");
    }

    #[test]
    fn test_select_star() {
        let stmt = select("people", &SelectCriteria::new());
        assert_eq!(stmt.sql, "SELECT * FROM \"people\"");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_select_all_clauses() {
        let criteria = SelectCriteria::new()
            .columns(["first_name", "last_name"])
            .where_(WhereCriteria::new("active = $1").bind(true))
            .order_by(["last_name", "first_name"])
            .limit(1)
            .offset(1);
        let stmt = select("people", &criteria);
        assert_eq!(
            stmt.sql,
            "SELECT \"first_name\", \"last_name\" FROM \"people\" WHERE active = $1 \
             ORDER BY \"last_name\", \"first_name\" LIMIT 1 OFFSET 1"
        );
        assert_eq!(stmt.params, vec![SqlValue::Bool(true)]);
    }

    #[test]
    fn test_select_ignores_empty_where_clause() {
        let criteria = SelectCriteria::new().where_(WhereCriteria::default());
        assert_eq!(select("people", &criteria).sql, "SELECT * FROM \"people\"");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("people").sql, "TRUNCATE \"people\"");
    }

    #[test]
    fn test_update() {
        let values = row(&[
            ("comments", SqlValue::from("It's Fred")),
            ("age", SqlValue::Int16(40)),
        ]);
        let criteria = WhereCriteria::new("first_name = $1").bind("Fred");
        let stmt = update("people", &values, &criteria);
        assert_eq!(
            stmt.sql,
            "UPDATE \"people\" SET \"age\" = 40, \"comments\" = 'It''s Fred' WHERE first_name = $1"
        );
        assert_eq!(stmt.params, vec![SqlValue::from("Fred")]);
    }
}
