//! pgconn - A PostgreSQL adapter for a portable, database-agnostic connection interface
//!
//! Schema (DDL) and row (DML) operations are turned into PostgreSQL statements
//! and executed through tokio-postgres. PostgreSQL error codes are translated
//! into portable error kinds.
//!
//! # Example
//! ```ignore
//! use pgconn::{AddTableOptions, ColumnAttributes, Connection, DataType, WhereClause};
//!
//! let mut db = Connection::new("postgres://localhost/mydb");
//! db.connect().await?;
//!
//! db.add_table(
//!     "people",
//!     &[
//!         ColumnAttributes::new("id", DataType::Integer).not_null().primary_key(),
//!         ColumnAttributes::new("last_name", DataType::String).not_null(),
//!     ],
//!     AddTableOptions::default(),
//! )
//! .await?;
//!
//! let removed = db
//!     .delete("people", &WhereClause::eq("last_name", "Rubble").into())
//!     .await?;
//!
//! db.disconnect().await?;
//! ```

pub mod builders;
pub mod clauses;
pub mod config;
pub mod drivers;
pub mod error;
pub mod quote;
pub mod traits;
pub mod translate;
pub mod type_map;
pub mod types;

mod connection;

// Re-export main types for convenient access
pub use clauses::WhereClause;
pub use config::{ConnectionAttributes, ConnectionParams};
pub use connection::Connection;
pub use error::{DriverError, PgConnError, Result};
pub use traits::{Connector, DatabaseDriver};
pub use translate::Operation;
pub use types::{
    AddColumnOptions, AddIndexOptions, AddTableOptions, ColumnAttributes, DataObject, DataType,
    DropColumnOptions, DropForeignKeyOptions, DropIndexOptions, DropTableOptions,
    ForeignKeyAttributes, IndexAttributes, RawQueryResult, ReferentialAction, SelectCriteria,
    SqlValue, TableAttributes, WhereCriteria,
};
