//! Run failure classification
//!
//! Every failed run ends in exactly one [`ErrorKind`], which determines the
//! process exit code.

use crate::client::QueryError;
use crate::etl::RunState;

/// Closed set of ways a run can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The spreadsheet is missing, unreadable, or not shaped like a roster
    Input,
    /// Settings are missing or the warehouse could not be reached or logged into
    Connection,
    /// The destination table could not be created
    Schema,
    /// Rows could not be inserted or committed
    Publish,
}

impl ErrorKind {
    /// Process exit status; 1 and 2 are left to panics and clap usage errors
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Input => 3,
            Self::Connection => 4,
            Self::Schema => 5,
            Self::Publish => 6,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "InputError"),
            Self::Connection => write!(f, "ConnectionError"),
            Self::Schema => write!(f, "SchemaError"),
            Self::Publish => write!(f, "PublishError"),
        }
    }
}

/// A failed run: what kind of failure, the state it happened in, and why
#[derive(Debug, thiserror::Error)]
#[error("{kind} while {state}: {report:#}")]
pub struct RunError {
    kind: ErrorKind,
    state: RunState,
    report: eyre::Report,
}

impl RunError {
    pub fn new(kind: ErrorKind, state: RunState, report: eyre::Report) -> Self {
        Self {
            kind,
            state,
            report,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// State the run was in when it failed
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn report(&self) -> &eyre::Report {
        &self.report
    }

    /// The warehouse query error behind this failure, if there is one
    pub fn query_error(&self) -> Option<&QueryError> {
        self.report
            .chain()
            .find_map(|cause| cause.downcast_ref::<QueryError>())
    }

    /// One-line message for the operator
    ///
    /// Anything that fails while statements run against an open session,
    /// including a connection lost mid-publish, is a SQL error.
    pub fn diagnostic(&self) -> String {
        match (self.query_error(), self.kind) {
            (Some(query), _) => format!("SQL error occurred: {}", query),
            (None, ErrorKind::Schema | ErrorKind::Publish) => {
                format!("SQL error occurred: {:#}", self.report)
            }
            (None, _) => format!("An unexpected error occurred: {:#}", self.report),
        }
    }
}
