//! Pipeline orchestration for the roster ETL run

use super::{Extractor, Loader, Transformer};
use crate::client::{Connector, Warehouse};
use crate::error::{ErrorKind, RunError};
use crate::publish::{Destination, TablePublisher, TableRow};

/// Process-level state of a pipeline run
///
/// A run moves through the states in declaration order. A state is entered
/// when its work begins; any failure ends the run in [`RunState::Failed`]
/// and the [`RunError`] records the state that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loading,
    Normalizing,
    Connecting,
    SchemaEnsured,
    Publishing,
    Done,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Normalizing => write!(f, "normalizing"),
            Self::Connecting => write!(f, "connecting"),
            Self::SchemaEnsured => write!(f, "ensuring schema"),
            Self::Publishing => write!(f, "publishing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub extracted: usize,
    pub published: usize,
    pub state: RunState,
}

/// ETL pipeline from a source sheet to a warehouse table
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item into table rows)
/// - `C`: Connector that opens the warehouse session
///
/// The session is opened only after the rows are loaded and normalized, and
/// it is closed on every path out of the publish phase.
///
/// # Example
/// ```no_run
/// use roster_publisher::client::{SnowflakeConnector, WarehouseConfig};
/// use roster_publisher::etl::Pipeline;
/// use roster_publisher::publish::Destination;
/// use roster_publisher::roster::roster_extractor;
/// use roster_publisher::transform::roster_transformer;
///
/// # async fn example() -> eyre::Result<()> {
/// let pipeline = Pipeline::new(
///     roster_extractor("H+ Sport Employees.xlsx", "Emp"),
///     roster_transformer(),
///     SnowflakeConnector::try_new(WarehouseConfig::from_env()?)?,
///     Destination::new("Employees"),
/// );
///
/// match pipeline.run().await {
///     Ok(report) => println!("Published {} rows", report.published),
///     Err(err) => eprintln!("{}", err.diagnostic()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, C> {
    extractor: E,
    transformer: T,
    connector: C,
    destination: Destination,
}

impl<E, T, C> Pipeline<E, T, C>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    T::Output: TableRow,
    C: Connector,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, connector: C, destination: Destination) -> Self {
        Self {
            extractor,
            transformer,
            connector,
            destination,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Run the complete pipeline once
    ///
    /// Steps:
    /// 1. Extract rows from the source
    /// 2. Transform them into table rows
    /// 3. Open a warehouse session
    /// 4. Ensure the destination table
    /// 5. Insert the rows
    ///
    /// # Errors
    /// Returns a [`RunError`] classified by the step that failed. There are
    /// no retries.
    pub async fn run(&self) -> Result<RunReport, RunError> {
        let mut state = RunState::Idle;
        log::info!("Starting roster pipeline");

        advance(&mut state, RunState::Loading);
        let items = self
            .extractor
            .extract()
            .await
            .map_err(|e| fail(ErrorKind::Input, state, e))?;
        let extracted = items.len();
        log::info!("Extracted {} row(s)", extracted);

        advance(&mut state, RunState::Normalizing);
        let rows = self
            .transformer
            .transform_many(items)
            .map_err(|e| fail(ErrorKind::Input, state, e))?;
        log::info!("Normalized {} row(s)", rows.len());
        if rows.is_empty() {
            log::warn!("No rows extracted, the table will be published empty");
        }

        advance(&mut state, RunState::Connecting);
        let session = self
            .connector
            .connect()
            .await
            .map_err(|e| fail(ErrorKind::Connection, state, e))?;

        let outcome = self.publish(&session, rows, &mut state).await;
        if let Err(err) = session.close().await {
            log::warn!("Failed to close warehouse session: {:#}", err);
        }
        let published = outcome?;

        advance(&mut state, RunState::Done);
        Ok(RunReport {
            extracted,
            published,
            state,
        })
    }

    async fn publish<W: Warehouse>(
        &self,
        session: &W,
        rows: Vec<T::Output>,
        state: &mut RunState,
    ) -> Result<usize, RunError> {
        let publisher = TablePublisher::<W, T::Output>::new(session, &self.destination);

        advance(state, RunState::SchemaEnsured);
        publisher
            .ensure_table()
            .await
            .map_err(|e| fail(ErrorKind::Schema, *state, e))?;

        advance(state, RunState::Publishing);
        publisher
            .load(rows)
            .await
            .map_err(|e| fail(ErrorKind::Publish, *state, e))
    }
}

fn advance(state: &mut RunState, next: RunState) {
    log::debug!("Pipeline state: {:?} -> {:?}", state, next);
    *state = next;
}

fn fail(kind: ErrorKind, state: RunState, report: eyre::Report) -> RunError {
    log::debug!("Pipeline state: {:?} -> {:?}", state, RunState::Failed);
    RunError::new(kind, state, report)
}
