use crate::quote::quote_ident;
use crate::types::{SqlValue, WhereCriteria};

/// Represents a WHERE clause condition.
/// Supports basic comparison operations and logical combinations, and
/// compiles to a [`WhereCriteria`] with quoted column names and `$n`
/// placeholders.
#[derive(Debug, Clone)]
pub enum WhereClause {
    /// column = value
    Eq(String, SqlValue),
    /// column IS NULL
    IsNull(String),
    /// clause AND clause
    And(Box<WhereClause>, Box<WhereClause>),
    /// clause OR clause
    Or(Box<WhereClause>, Box<WhereClause>),
}

impl WhereClause {
    /// Creates an equality condition: column = value
    pub fn eq<V: Into<SqlValue>>(column: impl Into<String>, value: V) -> Self {
        WhereClause::Eq(column.into(), value.into())
    }

    /// Creates a null test: column IS NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        WhereClause::IsNull(column.into())
    }

    /// Combines this clause with another using AND
    pub fn and(self, other: WhereClause) -> Self {
        WhereClause::And(Box::new(self), Box::new(other))
    }

    /// Combines this clause with another using OR
    pub fn or(self, other: WhereClause) -> Self {
        WhereClause::Or(Box::new(self), Box::new(other))
    }

    /// Builds the SQL string and collects parameters.
    /// `param_offset` is the number of placeholders already used, so the first
    /// one emitted here is `$param_offset + 1`.
    pub fn build_sql(&self, param_offset: usize, params: &mut Vec<SqlValue>) -> String {
        match self {
            WhereClause::Eq(column, value) => {
                params.push(value.clone());
                format!("{} = ${}", quote_ident(column), param_offset + params.len())
            }
            WhereClause::IsNull(column) => format!("{} IS NULL", quote_ident(column)),
            WhereClause::And(left, right) => {
                let left_sql = left.build_sql(param_offset, params);
                let right_sql = right.build_sql(param_offset, params);
                format!("({}) AND ({})", left_sql, right_sql)
            }
            WhereClause::Or(left, right) => {
                let left_sql = left.build_sql(param_offset, params);
                let right_sql = right.build_sql(param_offset, params);
                format!("({}) OR ({})", left_sql, right_sql)
            }
        }
    }
}

impl From<WhereClause> for WhereCriteria {
    fn from(clause: WhereClause) -> Self {
        let mut values = Vec::new();
        let clause = clause.build_sql(0, &mut values);
        WhereCriteria { clause, values }
    }
}
