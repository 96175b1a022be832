//! Mapping between portable [`DataType`]s and PostgreSQL type names.

use crate::types::DataType;

/// Portable type to the SQL type used in column definitions.
const SQL_TYPES: &[(DataType, &str)] = &[
    (DataType::BigInt, "bigint"),
    (DataType::Boolean, "boolean"),
    (DataType::Date, "date"),
    (DataType::DateTime, "timestamp with time zone"),
    (DataType::Double, "double precision"),
    (DataType::Float, "real"),
    (DataType::Integer, "integer"),
    (DataType::SmallInt, "smallint"),
    (DataType::String, "character varying (255)"),
    (DataType::Text, "text"),
    (DataType::Time, "time without time zone"),
    // PostgreSQL has no one-byte integer.
    (DataType::TinyInt, "smallint"),
];

/// Introspected type names (`information_schema.columns.data_type` and the
/// internal aliases) back to portable types.
const INTROSPECTED_TYPES: &[(&str, DataType)] = &[
    ("bigint", DataType::BigInt),
    ("int8", DataType::BigInt),
    ("boolean", DataType::Boolean),
    ("bool", DataType::Boolean),
    ("date", DataType::Date),
    ("character varying", DataType::String),
    ("varchar", DataType::String),
    ("double precision", DataType::Double),
    ("float8", DataType::Double),
    ("real", DataType::Float),
    ("float4", DataType::Float),
    ("integer", DataType::Integer),
    ("int", DataType::Integer),
    ("int4", DataType::Integer),
    ("smallint", DataType::SmallInt),
    ("int2", DataType::SmallInt),
    ("text", DataType::Text),
];

/// Serial types used for primary key columns.
const SERIAL_TYPES: &[(DataType, &str)] = &[
    (DataType::BigInt, "bigserial"),
    (DataType::SmallInt, "smallserial"),
];

const DEFAULT_SERIAL_TYPE: &str = "serial";

/// Returns the SQL type name for a portable type.
pub fn to_sql_type(data_type: DataType) -> &'static str {
    SQL_TYPES
        .iter()
        .find(|(t, _)| *t == data_type)
        .map(|(_, sql)| *sql)
        .unwrap_or("character varying (255)")
}

/// Returns the auto-incrementing type used for a primary key declared as `data_type`.
pub fn to_serial_type(data_type: DataType) -> &'static str {
    SERIAL_TYPES
        .iter()
        .find(|(t, _)| *t == data_type)
        .map(|(_, sql)| *sql)
        .unwrap_or(DEFAULT_SERIAL_TYPE)
}

/// Maps an introspected type name back to a portable type.
///
/// Date/time names carry precision and time zone suffixes, so they are
/// matched by prefix first. Unknown names map to [`DataType::String`].
pub fn to_data_type(sql_type: &str) -> DataType {
    if sql_type.starts_with("timestamp") {
        return DataType::DateTime;
    }
    if sql_type.starts_with("time") {
        return DataType::Time;
    }
    INTROSPECTED_TYPES
        .iter()
        .find(|(name, _)| *name == sql_type)
        .map(|(_, t)| *t)
        .unwrap_or(DataType::String)
}
