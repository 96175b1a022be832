use tracing::{debug, info, warn};

use crate::builders::{ddl, dml, Statement};
use crate::config::ConnectionParams;
use crate::drivers::TokioPostgresConnector;
use crate::error::{PgConnError, Result};
use crate::traits::{Connector, DatabaseDriver};
use crate::translate::{translate, Operation};
use crate::types::{
    AddColumnOptions, AddIndexOptions, AddTableOptions, ColumnAttributes, DataObject,
    DropColumnOptions, DropForeignKeyOptions, DropIndexOptions, DropTableOptions,
    ForeignKeyAttributes, IndexAttributes, RawQueryResult, SelectCriteria, TableAttributes,
    WhereCriteria,
};

/// A connection to a PostgreSQL database.
///
/// Starts disconnected. [`connect`](Connection::connect) opens the native
/// client, which this connection owns until
/// [`disconnect`](Connection::disconnect). Every schema and data operation
/// fails with [`PgConnError::NotConnected`] while disconnected.
///
/// # Example
/// ```ignore
/// let mut db = Connection::new("postgres://localhost/mydb");
/// db.connect().await?;
/// db.add_table("users", &columns, AddTableOptions::default()).await?;
/// let rows = db.select("users", &SelectCriteria::new().limit(10)).await?;
/// db.disconnect().await?;
/// ```
pub struct Connection {
    params: ConnectionParams,
    connector: Box<dyn Connector>,
    driver: Option<Box<dyn DatabaseDriver>>,
}

impl Connection {
    /// Create a disconnected connection that will use tokio-postgres.
    pub fn new(params: impl Into<ConnectionParams>) -> Self {
        Self::with_connector(params, TokioPostgresConnector)
    }

    /// Create a disconnected connection with a custom connector.
    /// Useful for testing or using alternative database drivers.
    pub fn with_connector(
        params: impl Into<ConnectionParams>,
        connector: impl Connector + 'static,
    ) -> Self {
        Self {
            params: params.into(),
            connector: Box::new(connector),
            driver: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_some()
    }

    // Connection lifecycle ------------------------------------------------

    /// Open the native client. On failure the connection stays disconnected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(PgConnError::AlreadyConnected);
        }
        let driver = self
            .connector
            .connect(&self.params)
            .await
            .map_err(PgConnError::ConnectionFailed)?;
        self.driver = Some(driver);
        info!(operation = %Operation::Connect, "connected");
        Ok(())
    }

    /// Release the native client.
    pub async fn disconnect(&mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => {
                drop(driver);
                info!(operation = %Operation::Disconnect, "disconnected");
                Ok(())
            }
            None => Err(PgConnError::NotConnected),
        }
    }

    /// Not supported by this adapter.
    pub async fn add_database(&self, _name: &str) -> Result<()> {
        Err(PgConnError::NotSupported("add_database".to_string()))
    }

    /// Not supported by this adapter.
    pub async fn drop_database(&self, _name: &str) -> Result<()> {
        Err(PgConnError::NotSupported("drop_database".to_string()))
    }

    // Schema operations ---------------------------------------------------

    /// Add one or more columns to a table in a single statement.
    /// An empty `columns` slice fails with [`PgConnError::InvalidInput`].
    pub async fn add_column(
        &self,
        table: &str,
        columns: &[ColumnAttributes],
        options: AddColumnOptions,
    ) -> Result<()> {
        self.driver()?;
        require_input(Operation::AddColumn, !columns.is_empty(), "no columns given")?;
        let statement = ddl::add_columns(table, columns, &options);
        self.execute(Operation::AddColumn, statement).await?;
        Ok(())
    }

    /// Add a foreign key from `table.column`. Returns the constraint name.
    pub async fn add_foreign_key(
        &self,
        table: &str,
        column: &str,
        foreign_key: &ForeignKeyAttributes,
    ) -> Result<String> {
        self.driver()?;
        let (statement, name) = ddl::add_foreign_key(table, column, foreign_key);
        self.execute(Operation::AddForeignKey, statement).await?;
        Ok(name)
    }

    /// Create an index. Returns the index name, derived when not given.
    /// The index must name at least one column.
    pub async fn add_index(
        &self,
        table: &str,
        index: &IndexAttributes,
        options: AddIndexOptions,
    ) -> Result<String> {
        self.driver()?;
        require_input(Operation::AddIndex, !index.columns.is_empty(), "no columns given")?;
        let (statement, name) = ddl::add_index(table, index, &options);
        self.execute(Operation::AddIndex, statement).await?;
        Ok(name)
    }

    pub async fn add_table(
        &self,
        table: &str,
        columns: &[ColumnAttributes],
        options: AddTableOptions,
    ) -> Result<()> {
        self.driver()?;
        let statement = ddl::add_table(table, columns, &options);
        self.execute(Operation::AddTable, statement).await?;
        Ok(())
    }

    /// Describe a table's columns. Indexes and foreign keys are not reported.
    pub async fn describe_table(&self, table: &str) -> Result<TableAttributes> {
        self.driver()?;
        let found = self
            .query(Operation::DescribeTable, ddl::table_exists(table))
            .await?;
        if found.is_empty() {
            return Err(PgConnError::TableNotFound {
                context: Operation::DescribeTable.to_string(),
                source: None,
            });
        }

        let columns = self
            .query(Operation::DescribeTable, ddl::table_columns(table))
            .await?
            .into_data_objects()
            .iter()
            .map(ddl::column_attributes)
            .collect();

        Ok(TableAttributes {
            name: table.to_string(),
            columns,
        })
    }

    pub async fn drop_column(
        &self,
        table: &str,
        column: &str,
        options: DropColumnOptions,
    ) -> Result<()> {
        self.driver()?;
        let statement = ddl::drop_column(table, column, &options);
        self.execute(Operation::DropColumn, statement).await?;
        Ok(())
    }

    pub async fn drop_foreign_key(
        &self,
        table: &str,
        constraint: &str,
        options: DropForeignKeyOptions,
    ) -> Result<()> {
        self.driver()?;
        let statement = ddl::drop_foreign_key(table, constraint, &options);
        self.execute(Operation::DropForeignKey, statement).await?;
        Ok(())
    }

    /// Drop an index. Index names are unique per schema, so `table` is
    /// only used for logging.
    pub async fn drop_index(
        &self,
        table: &str,
        index: &str,
        options: DropIndexOptions,
    ) -> Result<()> {
        self.driver()?;
        debug!(table, index, "dropping index");
        let statement = ddl::drop_index(index, &options);
        self.execute(Operation::DropIndex, statement).await?;
        Ok(())
    }

    pub async fn drop_table(&self, table: &str, options: DropTableOptions) -> Result<()> {
        self.driver()?;
        let statement = ddl::drop_table(table, &options);
        self.execute(Operation::DropTable, statement).await?;
        Ok(())
    }

    /// Not supported by this adapter.
    pub async fn drop_tables(&self) -> Result<()> {
        self.driver()?;
        Err(PgConnError::NotSupported("drop_tables".to_string()))
    }

    // Data operations -----------------------------------------------------

    /// Delete matching rows. Returns the number of rows deleted.
    pub async fn delete(&self, table: &str, criteria: &WhereCriteria) -> Result<u64> {
        self.driver()?;
        self.execute(Operation::Delete, dml::delete(table, criteria))
            .await
    }

    /// Insert rows one statement at a time. Returns the number of rows inserted.
    ///
    /// Not atomic: if a row fails, the rows before it stay inserted and the
    /// rest are not attempted. See
    /// [`insert_in_transaction`](Connection::insert_in_transaction).
    pub async fn insert(&self, table: &str, rows: &[DataObject]) -> Result<u64> {
        self.driver()?;
        let mut inserted = 0;
        for row in rows {
            inserted += self.execute(Operation::Insert, dml::insert(table, row)).await?;
        }
        Ok(inserted)
    }

    /// Insert rows inside a single transaction: either every row is inserted
    /// or none is.
    pub async fn insert_in_transaction(&self, table: &str, rows: &[DataObject]) -> Result<u64> {
        self.driver()?;
        self.execute(Operation::Insert, Statement::text("BEGIN"))
            .await?;
        match self.insert(table, rows).await {
            Ok(inserted) => {
                self.execute(Operation::Insert, Statement::text("COMMIT"))
                    .await?;
                Ok(inserted)
            }
            Err(e) => {
                warn!(table, error = %e, "insert failed, rolling back");
                if let Err(rollback) = self
                    .execute(Operation::Insert, Statement::text("ROLLBACK"))
                    .await
                {
                    warn!(table, error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    pub async fn select(&self, table: &str, criteria: &SelectCriteria) -> Result<Vec<DataObject>> {
        self.driver()?;
        let result = self
            .query(Operation::Select, dml::select(table, criteria))
            .await?;
        Ok(result.into_data_objects())
    }

    pub async fn truncate(&self, table: &str) -> Result<()> {
        self.driver()?;
        self.execute(Operation::Truncate, dml::truncate(table))
            .await?;
        Ok(())
    }

    /// Update matching rows. Returns the number of rows updated.
    /// An empty `values` map fails with [`PgConnError::InvalidInput`].
    pub async fn update(
        &self,
        table: &str,
        values: &DataObject,
        criteria: &WhereCriteria,
    ) -> Result<u64> {
        self.driver()?;
        require_input(Operation::Update, !values.is_empty(), "no values given")?;
        self.execute(Operation::Update, dml::update(table, values, criteria))
            .await
    }

    // Private helpers -----------------------------------------------------

    fn driver(&self) -> Result<&dyn DatabaseDriver> {
        self.driver.as_deref().ok_or(PgConnError::NotConnected)
    }

    async fn execute(&self, operation: Operation, statement: Statement) -> Result<u64> {
        let driver = self.driver()?;
        debug!(operation = %operation, sql = %statement.sql, params = statement.params.len(), "execute");
        driver
            .execute(&statement.sql, &statement.params)
            .await
            .map_err(|e| translate(operation, e))
    }

    async fn query(&self, operation: Operation, statement: Statement) -> Result<RawQueryResult> {
        let driver = self.driver()?;
        debug!(operation = %operation, sql = %statement.sql, params = statement.params.len(), "query");
        driver
            .query(&statement.sql, &statement.params)
            .await
            .map_err(|e| translate(operation, e))
    }
}

fn require_input(operation: Operation, ok: bool, message: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(PgConnError::InvalidInput {
            context: operation.to_string(),
            message: message.to_string(),
        })
    }
}
