//! Warehouse session seams
//!
//! The publisher only needs to run statements and close the session, so it
//! talks to these traits rather than to a concrete client.

use super::{QueryOutcome, Statement};
use eyre::Result;
use std::future::Future;

/// An open warehouse session
pub trait Warehouse: Send + Sync {
    /// Execute one statement and wait for it to complete
    ///
    /// # Errors
    /// Statements rejected by the warehouse fail with a
    /// [`QueryError`](super::QueryError) in the error chain. Transport
    /// failures surface as plain reports.
    fn execute(&self, statement: &Statement) -> impl Future<Output = Result<QueryOutcome>> + Send;

    /// End the session
    fn close(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens warehouse sessions
pub trait Connector: Send + Sync {
    type Session: Warehouse;

    /// Authenticate and open a new session
    fn connect(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}
