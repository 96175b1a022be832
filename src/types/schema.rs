use std::fmt;

use serde::{Deserialize, Serialize};

/// Portable column types, independent of any SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    BigInt,
    Boolean,
    Date,
    DateTime,
    Double,
    Float,
    Integer,
    SmallInt,
    String,
    Text,
    Time,
    TinyInt,
}

impl DataType {
    pub const ALL: [DataType; 12] = [
        DataType::BigInt,
        DataType::Boolean,
        DataType::Date,
        DataType::DateTime,
        DataType::Double,
        DataType::Float,
        DataType::Integer,
        DataType::SmallInt,
        DataType::String,
        DataType::Text,
        DataType::Time,
        DataType::TinyInt,
    ];
}

/// Description of a single column, used to create columns and returned by
/// table introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAttributes {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default = "default_allow_null")]
    pub allow_null: bool,
    #[serde(default)]
    pub primary_key: bool,
    /// Accepted for portability; a serial type is only emitted for primary keys.
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub default_value: Option<String>,
}

fn default_allow_null() -> bool {
    true
}

impl ColumnAttributes {
    /// A nullable column with no default.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            allow_null: true,
            primary_key: false,
            auto_increment: false,
            default_value: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A table and its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAttributes {
    pub name: String,
    pub columns: Vec<ColumnAttributes>,
}

/// Index to be created on a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexAttributes {
    /// Derived from the table and column names when absent.
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexAttributes {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Action taken on the referencing rows when a referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    NoAction,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Foreign key from a column of one table to a column of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyAttributes {
    /// Derived from the table and column names when absent.
    pub name: Option<String>,
    /// Referenced table
    pub table_name: String,
    /// Referenced column
    pub column_name: String,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKeyAttributes {
    pub fn references(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            name: None,
            table_name: table_name.into(),
            column_name: column_name.into(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder_defaults() {
        let col = ColumnAttributes::new("id", DataType::Integer);
        assert!(col.allow_null);
        assert!(!col.primary_key);
        assert!(!col.auto_increment);
        assert_eq!(col.default_value, None);

        let col = col.not_null().primary_key().default_value("0");
        assert!(!col.allow_null);
        assert!(col.primary_key);
        assert_eq!(col.default_value.as_deref(), Some("0"));
    }

    #[test]
    fn test_column_deserializes_with_defaults() {
        let col: ColumnAttributes =
            serde_json::from_str(r#"{"name": "active", "type": "BOOLEAN", "default_value": "true"}"#)
                .unwrap();
        assert_eq!(col.data_type, DataType::Boolean);
        assert!(col.allow_null);
        assert_eq!(col.default_value.as_deref(), Some("true"));
    }

    #[test]
    fn test_data_type_serde_names() {
        let json = serde_json::to_string(&DataType::DateTime).unwrap();
        assert_eq!(json, "\"DATETIME\"");
        let parsed: DataType = serde_json::from_str("\"BIGINT\"").unwrap();
        assert_eq!(parsed, DataType::BigInt);
    }

    #[test]
    fn test_index_attributes_builder() {
        let index = IndexAttributes::new(["last_name", "first_name"]).unique();
        assert_eq!(index.columns, vec!["last_name", "first_name"]);
        assert!(index.unique);
        assert_eq!(index.name, None);
    }

    #[test]
    fn test_referential_action_sql() {
        assert_eq!(ReferentialAction::SetNull.to_string(), "SET NULL");
        assert_eq!(ReferentialAction::NoAction.as_sql(), "NO ACTION");
    }
}
