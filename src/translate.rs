//! Translation of PostgreSQL error codes into portable error kinds.
//!
//! See <https://www.postgresql.org/docs/current/errcodes-appendix.html>.

use std::fmt;

use crate::error::{DriverError, PgConnError};

/// The adapter operation a statement was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    Disconnect,
    AddColumn,
    AddForeignKey,
    AddIndex,
    AddTable,
    DescribeTable,
    DropColumn,
    DropForeignKey,
    DropIndex,
    DropTable,
    Delete,
    Insert,
    Select,
    Truncate,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Connect => "connect",
            Operation::Disconnect => "disconnect",
            Operation::AddColumn => "add_column",
            Operation::AddForeignKey => "add_foreign_key",
            Operation::AddIndex => "add_index",
            Operation::AddTable => "add_table",
            Operation::DescribeTable => "describe_table",
            Operation::DropColumn => "drop_column",
            Operation::DropForeignKey => "drop_foreign_key",
            Operation::DropIndex => "drop_index",
            Operation::DropTable => "drop_table",
            Operation::Delete => "delete",
            Operation::Insert => "insert",
            Operation::Select => "select",
            Operation::Truncate => "truncate",
            Operation::Update => "update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portable kinds a SQLSTATE code can translate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    TableNotFound,
    ColumnNotFound,
    IndexNotFound,
    DuplicateTable,
    DuplicateColumn,
    DuplicateIndex,
}

const NOT_NULL_VIOLATION: &str = "23502";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const DUPLICATE_COLUMN: &str = "42701";
const UNDEFINED_COLUMN: &str = "42703";
const UNDEFINED_OBJECT: &str = "42704";
const UNDEFINED_TABLE: &str = "42P01";
const DUPLICATE_TABLE: &str = "42P07";

/// Picks the portable kind for a code. `None` means the error passes through.
///
/// `undefined_object` and `duplicate_table` cover several object types, so
/// the calling operation decides which kind they become.
fn kind_for(code: &str, operation: Operation) -> Option<Kind> {
    match code {
        NOT_NULL_VIOLATION | FOREIGN_KEY_VIOLATION | UNIQUE_VIOLATION => None,
        DUPLICATE_COLUMN => Some(Kind::DuplicateColumn),
        UNDEFINED_COLUMN => Some(Kind::ColumnNotFound),
        UNDEFINED_TABLE => Some(Kind::TableNotFound),
        UNDEFINED_OBJECT => match operation {
            Operation::DropIndex | Operation::AddIndex => Some(Kind::IndexNotFound),
            _ => None,
        },
        DUPLICATE_TABLE => match operation {
            Operation::AddIndex => Some(Kind::DuplicateIndex),
            Operation::AddTable => Some(Kind::DuplicateTable),
            _ => None,
        },
        _ => None,
    }
}

/// Translates a native error raised while running `operation`.
///
/// Errors without a code, and codes with no portable kind, come back as
/// [`PgConnError::Database`] with the native error intact.
pub fn translate(operation: Operation, error: DriverError) -> PgConnError {
    let context = operation.as_str().to_string();
    let kind = error
        .code
        .as_deref()
        .and_then(|code| kind_for(code, operation));
    let Some(kind) = kind else {
        return PgConnError::Database {
            context,
            source: error,
        };
    };

    let source = Some(error);
    match kind {
        Kind::TableNotFound => PgConnError::TableNotFound { context, source },
        Kind::ColumnNotFound => PgConnError::ColumnNotFound { context, source },
        Kind::IndexNotFound => PgConnError::IndexNotFound { context, source },
        Kind::DuplicateTable => PgConnError::DuplicateTable { context, source },
        Kind::DuplicateColumn => PgConnError::DuplicateColumn { context, source },
        Kind::DuplicateIndex => PgConnError::DuplicateIndex { context, source },
    }
}
