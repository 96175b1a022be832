use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ConnectionParams;
use crate::error::DriverResult;
use crate::types::{RawQueryResult, SqlValue};

/// Trait for native database driver implementations.
/// Drivers are responsible for:
/// - Converting SqlValue parameters to native types
/// - Executing statements and converting results to RawQueryResult
/// - Reporting failures as DriverError, with the SQLSTATE code when known
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Run a statement that returns rows.
    /// Parameters use PostgreSQL-style placeholders ($1, $2, etc.)
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DriverResult<RawQueryResult>;

    /// Run a statement and return the number of rows it affected.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DriverResult<u64>;
}

#[async_trait]
impl<T: DatabaseDriver + ?Sized> DatabaseDriver for Arc<T> {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DriverResult<RawQueryResult> {
        (**self).query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DriverResult<u64> {
        (**self).execute(sql, params).await
    }
}

/// Opens a driver from connection parameters.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, params: &ConnectionParams) -> DriverResult<Box<dyn DatabaseDriver>>;
}
