//! Error types for blitz operations.
//!
//! A sync run distinguishes two classes of failure:
//!
//! - **Per-file failures** (malformed files, filesystem errors, rejected
//!   inserts) are recorded in the sync report and the run moves on.
//! - **Fatal failures** (the database session itself failing) abort the
//!   remaining run. See [`Error::is_fatal`].

use std::io;
use thiserror::Error;

use crate::domain::IssueId;

/// The error type for blitz operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// The database rejected a write (unknown project, duplicate id, ...).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Reading or writing an issue file failed.
    #[error(transparent)]
    Markdown(#[from] blitz_markdown::Error),

    /// Invalid configuration or arguments.
    #[error("configuration error: {0}")]
    Config(String),

    /// Issue not found.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// Project not found.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// An external command exited unsuccessfully.
    #[error("command `{program}` failed ({status}): {stderr}")]
    Command {
        /// Program that was run.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Gave up waiting for an external resource.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// Invariant violated inside blitz itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns `true` if this error must abort a sync run.
    ///
    /// Everything else is scoped to the file being processed.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(e.to_string())
            }
            other => Self::Database(other),
        }
    }
}

/// A specialized Result type for blitz operations.
pub type Result<T> = std::result::Result<T, Error>;
