//! Schema statements: tables, columns, indexes and foreign keys.

use crate::builders::naming::{foreign_key_name, index_name};
use crate::builders::Statement;
use crate::clauses::{column_clause, table_clause};
use crate::quote::{quote_ident, quote_idents};
use crate::type_map::to_data_type;
use crate::types::{
    AddColumnOptions, AddIndexOptions, AddTableOptions, ColumnAttributes, DataObject,
    DropColumnOptions, DropForeignKeyOptions, DropIndexOptions, DropTableOptions,
    ForeignKeyAttributes, IndexAttributes, SqlValue,
};

/// Schema searched by table introspection.
pub const DEFAULT_SCHEMA: &str = "public";

const TABLE_EXISTS_QUERY: &str = "SELECT table_name::text AS table_name \
     FROM information_schema.tables \
     WHERE table_schema = $1::text AND table_name = $2::text";

const TABLE_COLUMNS_QUERY: &str = "SELECT column_name::text AS column_name, \
     data_type::text AS data_type, \
     is_nullable::text AS is_nullable, \
     column_default::text AS column_default \
     FROM information_schema.columns \
     WHERE table_schema = $1::text AND table_name = $2::text \
     ORDER BY ordinal_position";

pub fn add_table(table: &str, columns: &[ColumnAttributes], options: &AddTableOptions) -> Statement {
    let mut sql = String::from("CREATE TABLE");
    if options.if_not_exists {
        sql.push_str(" IF NOT EXISTS");
    }
    sql.push(' ');
    sql.push_str(&quote_ident(table));
    sql.push_str(" (");
    sql.push_str(&table_clause(columns));
    sql.push(')');
    Statement::text(sql)
}

/// One ALTER TABLE adding every column in `columns`.
pub fn add_columns(
    table: &str,
    columns: &[ColumnAttributes],
    options: &AddColumnOptions,
) -> Statement {
    let action = if options.if_not_exists {
        "ADD COLUMN IF NOT EXISTS"
    } else {
        "ADD COLUMN"
    };
    let actions = columns
        .iter()
        .map(|c| format!("{} {}", action, column_clause(c)))
        .collect::<Vec<_>>()
        .join(", ");
    Statement::text(format!("ALTER TABLE {} {}", quote_ident(table), actions))
}

/// Returns the statement and the index name it uses.
pub fn add_index(
    table: &str,
    index: &IndexAttributes,
    options: &AddIndexOptions,
) -> (Statement, String) {
    let name = index
        .name
        .clone()
        .unwrap_or_else(|| index_name(table, index.columns.as_slice()));

    let mut sql = String::from("CREATE");
    if index.unique {
        sql.push_str(" UNIQUE");
    }
    sql.push_str(" INDEX");
    if options.concurrently {
        sql.push_str(" CONCURRENTLY");
    }
    if options.if_not_exists {
        sql.push_str(" IF NOT EXISTS");
    }
    sql.push_str(&format!(
        " {} ON {} ({})",
        quote_ident(&name),
        quote_ident(table),
        quote_idents(index.columns.as_slice())
    ));
    (Statement::text(sql), name)
}

/// Returns the statement and the constraint name it uses.
pub fn add_foreign_key(
    table: &str,
    column: &str,
    foreign_key: &ForeignKeyAttributes,
) -> (Statement, String) {
    let name = foreign_key
        .name
        .clone()
        .unwrap_or_else(|| foreign_key_name(table, column));

    let mut sql = format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        quote_ident(table),
        quote_ident(&name),
        quote_ident(column),
        quote_ident(&foreign_key.table_name),
        quote_ident(&foreign_key.column_name)
    );
    if let Some(action) = foreign_key.on_delete {
        sql.push_str(" ON DELETE ");
        sql.push_str(action.as_sql());
    }
    if let Some(action) = foreign_key.on_update {
        sql.push_str(" ON UPDATE ");
        sql.push_str(action.as_sql());
    }
    (Statement::text(sql), name)
}

pub fn drop_column(table: &str, column: &str, options: &DropColumnOptions) -> Statement {
    let mut sql = format!("ALTER TABLE {} DROP COLUMN", quote_ident(table));
    if options.if_exists {
        sql.push_str(" IF EXISTS");
    }
    sql.push(' ');
    sql.push_str(&quote_ident(column));
    if options.cascade {
        sql.push_str(" CASCADE");
    }
    Statement::text(sql)
}

pub fn drop_foreign_key(
    table: &str,
    constraint: &str,
    options: &DropForeignKeyOptions,
) -> Statement {
    let mut sql = format!("ALTER TABLE {} DROP CONSTRAINT", quote_ident(table));
    if options.if_exists {
        sql.push_str(" IF EXISTS");
    }
    sql.push(' ');
    sql.push_str(&quote_ident(constraint));
    if options.cascade {
        sql.push_str(" CASCADE");
    }
    Statement::text(sql)
}

/// Index names are schema-wide in PostgreSQL, so no table appears here.
pub fn drop_index(index: &str, options: &DropIndexOptions) -> Statement {
    let mut sql = String::from("DROP INDEX");
    if options.concurrently {
        sql.push_str(" CONCURRENTLY");
    }
    if options.if_exists {
        sql.push_str(" IF EXISTS");
    }
    sql.push(' ');
    sql.push_str(&quote_ident(index));
    if options.cascade {
        sql.push_str(" CASCADE");
    }
    Statement::text(sql)
}

pub fn drop_table(table: &str, options: &DropTableOptions) -> Statement {
    let mut sql = String::from("DROP TABLE");
    if options.if_exists {
        sql.push_str(" IF EXISTS");
    }
    sql.push(' ');
    sql.push_str(&quote_ident(table));
    if options.cascade {
        sql.push_str(" CASCADE");
    }
    Statement::text(sql)
}

/// Returns one row if the table exists in the default schema.
pub fn table_exists(table: &str) -> Statement {
    Statement::with_params(TABLE_EXISTS_QUERY, introspection_params(table))
}

/// Lists the table's columns in declaration order.
pub fn table_columns(table: &str) -> Statement {
    Statement::with_params(TABLE_COLUMNS_QUERY, introspection_params(table))
}

fn introspection_params(table: &str) -> Vec<SqlValue> {
    vec![SqlValue::from(DEFAULT_SCHEMA), SqlValue::from(table)]
}

/// Converts a row of [`table_columns`] into column attributes.
///
/// A `nextval(...)` default marks a serial column, which is reported as an
/// auto-incrementing primary key with no default value.
pub fn column_attributes(row: &DataObject) -> ColumnAttributes {
    let text = |key: &str| row.get(key).and_then(SqlValue::as_str);

    let default = text("column_default");
    let serial = default.map_or(false, |d| d.starts_with("nextval"));

    ColumnAttributes {
        name: text("column_name").unwrap_or_default().to_string(),
        data_type: to_data_type(text("data_type").unwrap_or_default()),
        allow_null: text("is_nullable") == Some("YES"),
        primary_key: serial,
        auto_increment: serial,
        default_value: if serial { None } else { default.map(str::to_string) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, ReferentialAction};

    #[test]
    fn test_add_table() {
        let cols = vec![
            ColumnAttributes::new("id", DataType::Integer).not_null().primary_key(),
            ColumnAttributes::new("name", DataType::String).not_null(),
        ];
        let stmt = add_table("users", &cols, &AddTableOptions::default());
        assert_eq!(
            stmt.sql,
            "CREATE TABLE \"users\" (\"id\" serial NOT NULL PRIMARY KEY, \"name\" character varying (255) NOT NULL)"
        );
        assert!(stmt.params.is_empty());

        let stmt = add_table("users", &cols[1..], &AddTableOptions { if_not_exists: true });
        assert_eq!(
            stmt.sql,
            "CREATE TABLE IF NOT EXISTS \"users\" (\"name\" character varying (255) NOT NULL)"
        );
    }

    #[test]
    fn test_add_columns_single_and_batch() {
        let one = vec![ColumnAttributes::new("age", DataType::SmallInt)];
        assert_eq!(
            add_columns("users", &one, &AddColumnOptions::default()).sql,
            "ALTER TABLE \"users\" ADD COLUMN \"age\" smallint"
        );

        let two = vec![
            ColumnAttributes::new("age", DataType::SmallInt),
            ColumnAttributes::new("order", DataType::Integer).not_null().default_value("0"),
        ];
        assert_eq!(
            add_columns("users", &two, &AddColumnOptions { if_not_exists: true }).sql,
            "ALTER TABLE \"users\" ADD COLUMN IF NOT EXISTS \"age\" smallint, \
             ADD COLUMN IF NOT EXISTS \"order\" integer NOT NULL DEFAULT '0'"
        );
    }

    #[test]
    fn test_add_index_derives_name() {
        let index = IndexAttributes::new(["last_name", "first_name"]);
        let (stmt, name) = add_index("users", &index, &AddIndexOptions::default());
        assert_eq!(name, "users_last_name_first_name_idx");
        assert_eq!(
            stmt.sql,
            "CREATE INDEX \"users_last_name_first_name_idx\" ON \"users\" (\"last_name\", \"first_name\")"
        );
    }

    #[test]
    fn test_add_index_all_modifiers() {
        let index = IndexAttributes::new(["email"]).named("email_uq").unique();
        let options = AddIndexOptions {
            concurrently: true,
            if_not_exists: true,
        };
        let (stmt, name) = add_index("users", &index, &options);
        assert_eq!(name, "email_uq");
        assert_eq!(
            stmt.sql,
            "CREATE UNIQUE INDEX CONCURRENTLY IF NOT EXISTS \"email_uq\" ON \"users\" (\"email\")"
        );
    }

    #[test]
    fn test_add_foreign_key() {
        let fk = ForeignKeyAttributes::references("customers", "id")
            .on_delete(ReferentialAction::Cascade)
            .on_update(ReferentialAction::SetNull);
        let (stmt, name) = add_foreign_key("orders", "customer_id", &fk);
        assert_eq!(name, "orders_customer_id_fkey");
        assert_eq!(
            stmt.sql,
            "ALTER TABLE \"orders\" ADD CONSTRAINT \"orders_customer_id_fkey\" \
             FOREIGN KEY (\"customer_id\") REFERENCES \"customers\" (\"id\") \
             ON DELETE CASCADE ON UPDATE SET NULL"
        );

        let named = ForeignKeyAttributes::references("customers", "id").named("fk_cust");
        let (stmt, name) = add_foreign_key("orders", "customer_id", &named);
        assert_eq!(name, "fk_cust");
        assert!(stmt.sql.ends_with("REFERENCES \"customers\" (\"id\")"));
    }

    #[test]
    fn test_drop_statements() {
        let both = DropTableOptions {
            if_exists: true,
            cascade: true,
        };
        assert_eq!(drop_table("t", &both).sql, "DROP TABLE IF EXISTS \"t\" CASCADE");
        assert_eq!(drop_table("t", &DropTableOptions::default()).sql, "DROP TABLE \"t\"");

        assert_eq!(
            drop_column("t", "c", &DropColumnOptions { if_exists: true, cascade: false }).sql,
            "ALTER TABLE \"t\" DROP COLUMN IF EXISTS \"c\""
        );
        assert_eq!(
            drop_foreign_key("t", "t_c_fkey", &DropForeignKeyOptions { if_exists: false, cascade: true }).sql,
            "ALTER TABLE \"t\" DROP CONSTRAINT \"t_c_fkey\" CASCADE"
        );
        assert_eq!(
            drop_index(
                "t_c_idx",
                &DropIndexOptions {
                    cascade: true,
                    concurrently: true,
                    if_exists: true
                }
            )
            .sql,
            "DROP INDEX CONCURRENTLY IF EXISTS \"t_c_idx\" CASCADE"
        );
    }

    #[test]
    fn test_introspection_statements_bind_schema_and_table() {
        let stmt = table_exists("users");
        assert!(stmt.sql.contains("information_schema.tables"));
        assert_eq!(stmt.params, vec![SqlValue::from("public"), SqlValue::from("users")]);

        let stmt = table_columns("users");
        assert!(stmt.sql.contains("information_schema.columns"));
        assert!(stmt.sql.ends_with("ORDER BY ordinal_position"));
        assert_eq!(stmt.params.len(), 2);
    }

    fn column_row(name: &str, data_type: &str, nullable: &str, default: Option<&str>) -> DataObject {
        let mut row = DataObject::new();
        row.insert("column_name".into(), SqlValue::from(name));
        row.insert("data_type".into(), SqlValue::from(data_type));
        row.insert("is_nullable".into(), SqlValue::from(nullable));
        row.insert("column_default".into(), SqlValue::from(default));
        row
    }

    #[test]
    fn test_column_attributes_serial() {
        let row = column_row("id", "integer", "NO", Some("nextval('t_id_seq'::regclass)"));
        let col = column_attributes(&row);
        assert_eq!(col.name, "id");
        assert_eq!(col.data_type, DataType::Integer);
        assert!(!col.allow_null);
        assert!(col.primary_key);
        assert!(col.auto_increment);
        assert_eq!(col.default_value, None);
    }

    #[test]
    fn test_column_attributes_plain() {
        let row = column_row("created", "timestamp with time zone", "YES", None);
        let col = column_attributes(&row);
        assert_eq!(col.data_type, DataType::DateTime);
        assert!(col.allow_null);
        assert!(!col.primary_key);
        assert_eq!(col.default_value, None);

        let row = column_row("active", "boolean", "NO", Some("true"));
        let col = column_attributes(&row);
        assert_eq!(col.default_value.as_deref(), Some("true"));
        assert!(!col.auto_increment);
    }
}
