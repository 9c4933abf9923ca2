// dqgate-core/src/error.rs

use std::fmt;
use std::time::Duration;

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

/// Why a run was abandoned before a report could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller fired its cancellation token.
    Cancelled,
    /// The caller-supplied deadline elapsed.
    DeadlineExceeded(Duration),
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "cancelled by caller"),
            CancelReason::DeadlineExceeded(d) => write!(f, "deadline of {:.2?} exceeded", d),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum DqError {
    // --- DOMAIN ERRORS (validation failures, malformed rows, config) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, templating) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- RULE EXECUTION ---
    #[error("Query for rule '{rule}' failed: {source}")]
    #[diagnostic(
        code(dqgate::query_execution),
        help("Queries are not retried here; rerun the task once the warehouse is reachable.")
    )]
    QueryExecution {
        rule: String,
        #[source]
        source: InfrastructureError,
    },

    #[error("Data quality run aborted: {0}")]
    #[diagnostic(code(dqgate::cancelled))]
    Cancelled(CancelReason),

    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl DqError {
    /// True when the run produced a verdict on the data (as opposed to giving up).
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, DqError::Domain(DomainError::ValidationFailure(_)))
    }
}

impl From<std::io::Error> for DqError {
    fn from(err: std::io::Error) -> Self {
        DqError::Infrastructure(InfrastructureError::Io(err))
    }
}
