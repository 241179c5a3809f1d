//! Error taxonomy for query building and execution

use std::time::Duration;

use thiserror::Error;

/// Errors raised by builders and terminal operations
///
/// `InvalidArgument` is raised eagerly while a statement is being built, so a
/// builder that returned one never reaches the database. Driver failures are
/// passed through untouched in `Database`; nothing here retries.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("statement timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to decode row: {0}")]
    Decode(String),
}

impl QueryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        QueryError::InvalidArgument(reason.into())
    }
}

pub type Result<T, E = QueryError> = std::result::Result<T, E>;
