use std::collections::BTreeMap;

use crate::types::SqlValue;

/// A row of data keyed by column name.
/// Used both for insert/update payloads and for rows returned by a select.
pub type DataObject = BTreeMap<String, SqlValue>;

/// Driver-agnostic raw result from a database query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
    /// Rows affected by the statement, as reported by the server
    pub rows_affected: u64,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        let rows_affected = rows.len() as u64;
        Self {
            columns,
            rows,
            rows_affected,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A result with no rows, only an affected-row count.
    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reshapes each row into a `DataObject` keyed by column name.
    pub fn into_data_objects(self) -> Vec<DataObject> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|values| columns.iter().cloned().zip(values).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_data_objects() {
        let raw = RawQueryResult::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![SqlValue::Int32(1), SqlValue::from("John")],
                vec![SqlValue::Int32(2), SqlValue::Null],
            ],
        );
        assert_eq!(raw.rows_affected, 2);

        let rows = raw.into_data_objects();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], SqlValue::Int32(1));
        assert_eq!(rows[0]["name"], SqlValue::Text("John".to_string()));
        assert!(rows[1]["name"].is_null());
    }

    #[test]
    fn test_empty_result() {
        let raw = RawQueryResult::empty();
        assert!(raw.is_empty());
        assert_eq!(raw.rows_affected, 0);
        assert!(raw.into_data_objects().is_empty());
    }

    #[test]
    fn test_affected_only() {
        let raw = RawQueryResult::affected(3);
        assert!(raw.is_empty());
        assert_eq!(raw.rows_affected, 3);
    }
}
