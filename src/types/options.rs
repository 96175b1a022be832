//! PostgreSQL-specific options, one struct per DDL operation.
//!
//! Every flag defaults to `false`.

/// Options for `add_table`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddTableOptions {
    /// Silently ignore if the table already exists.
    pub if_not_exists: bool,
}

/// Options for `add_column`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddColumnOptions {
    /// Silently ignore columns that already exist.
    pub if_not_exists: bool,
}

/// Options for `add_index`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddIndexOptions {
    /// Build the index without locking out writes.
    pub concurrently: bool,
    /// Silently ignore if the index already exists.
    pub if_not_exists: bool,
}

/// Options for `drop_column`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropColumnOptions {
    /// Drop objects that depend on the column.
    pub cascade: bool,
    /// Silently ignore if the column does not exist.
    pub if_exists: bool,
}

/// Options for `drop_foreign_key`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropForeignKeyOptions {
    /// Drop objects that depend on the constraint.
    pub cascade: bool,
    /// Silently ignore if the constraint does not exist.
    pub if_exists: bool,
}

/// Options for `drop_index`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropIndexOptions {
    /// Drop objects that depend on the index.
    pub cascade: bool,
    /// Drop the index without locking out concurrent access.
    pub concurrently: bool,
    /// Silently ignore if the index does not exist.
    pub if_exists: bool,
}

/// Options for `drop_table`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropTableOptions {
    /// Drop objects that depend on the table.
    pub cascade: bool,
    /// Silently ignore if the table does not exist.
    pub if_exists: bool,
}
