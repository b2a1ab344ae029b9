//! Warehouse table publisher

use super::{TableRow, WritePolicy};
use crate::client::{Statement, Warehouse};
use crate::etl::Loader;
use eyre::{Context, Result};
use std::marker::PhantomData;

/// Rows per `INSERT` statement unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Where and how rows are published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub table: String,
    pub policy: WritePolicy,
    pub batch_size: usize,
}

impl Destination {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            policy: WritePolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the number of rows per `INSERT` (at least 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Loader that writes [`TableRow`]s into a warehouse table
///
/// [`ensure_table`](Self::ensure_table) issues the DDL for the destination
/// policy. [`load`](Loader::load) inserts all rows inside one transaction
/// and rolls back on any failure, so a failed run commits no rows.
///
/// # Example
/// ```no_run
/// use roster_publisher::client::{Connector, SnowflakeConnector, Warehouse, WarehouseConfig};
/// use roster_publisher::etl::Loader;
/// use roster_publisher::publish::{Destination, TablePublisher};
/// use roster_publisher::roster::EmployeeRecord;
///
/// # async fn example(records: Vec<EmployeeRecord>) -> eyre::Result<()> {
/// let session = SnowflakeConnector::try_new(WarehouseConfig::from_env()?)?
///     .connect()
///     .await?;
/// let destination = Destination::new("Employees");
/// let publisher = TablePublisher::<_, EmployeeRecord>::new(&session, &destination);
///
/// publisher.ensure_table().await?;
/// let count = publisher.load(records).await?;
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct TablePublisher<'a, W, R> {
    warehouse: &'a W,
    destination: &'a Destination,
    _rows: PhantomData<fn(R)>,
}

impl<'a, W, R> TablePublisher<'a, W, R>
where
    W: Warehouse,
    R: TableRow,
{
    pub fn new(warehouse: &'a W, destination: &'a Destination) -> Self {
        Self {
            warehouse,
            destination,
            _rows: PhantomData,
        }
    }

    /// Create the destination table according to the write policy
    ///
    /// # Errors
    /// Returns an error if the warehouse rejects the DDL
    pub async fn ensure_table(&self) -> Result<()> {
        let table = &self.destination.table;
        log::info!(
            "Ensuring table {} (policy: {})",
            table,
            self.destination.policy
        );
        let statement = R::schema().create_statement(table, self.destination.policy);
        self.warehouse
            .execute(&statement)
            .await
            .with_context(|| format!("Failed to create table {}", table))?;
        Ok(())
    }

    async fn insert_batches(&self, rows: &[R]) -> Result<usize> {
        let schema = R::schema();
        let table = &self.destination.table;
        let mut inserted = 0;

        for (index, batch) in rows.chunks(self.destination.batch_size.max(1)).enumerate() {
            let statement = schema.insert_statement(table, batch);
            let outcome = self.warehouse.execute(&statement).await.with_context(|| {
                format!(
                    "Failed to insert batch {} ({} row(s)) into {}",
                    index + 1,
                    batch.len(),
                    table
                )
            })?;

            if let Some(affected) = outcome.rows_affected()
                && affected != batch.len() as u64
            {
                eyre::bail!(
                    "Warehouse reported {} row(s) inserted for a batch of {}",
                    affected,
                    batch.len()
                );
            }

            inserted += batch.len();
            log::debug!("Inserted {}/{} row(s)", inserted, rows.len());
        }

        Ok(inserted)
    }
}

impl<W, R> Loader for TablePublisher<'_, W, R>
where
    W: Warehouse,
    R: TableRow,
{
    type Item = R;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let table = &self.destination.table;
        if items.is_empty() {
            log::warn!("No rows to publish to {}", table);
            return Ok(0);
        }

        self.warehouse
            .execute(&Statement::new("BEGIN"))
            .await
            .context("Failed to start transaction")?;

        match self.insert_batches(&items).await {
            Ok(count) => {
                self.warehouse
                    .execute(&Statement::new("COMMIT"))
                    .await
                    .context("Failed to commit inserted rows")?;
                log::info!("Inserted {} row(s) into {}", count, table);
                Ok(count)
            }
            Err(err) => {
                log::debug!("Rolling back after failed insert");
                if let Err(rollback) = self.warehouse.execute(&Statement::new("ROLLBACK")).await {
                    log::warn!("Rollback failed: {:#}", rollback);
                }
                Err(err)
            }
        }
    }
}
