//! Database error types for scout-db.

use scout_core::entities::ProfileRef;
use scout_core::enums::ProfileStatus;
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The addressed profile row does not exist.
    #[error("Profile not found: {profile}")]
    NotFound { profile: ProfileRef },

    /// The profile's status moved on since the caller read it.
    #[error("Stale transition for {profile}: expected current status {expected}")]
    StaleTransition {
        profile: ProfileRef,
        expected: ProfileStatus,
    },

    /// Invalid state encountered (bad input or bad data in the store).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Filesystem error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether this error reports a lost compare-and-swap rather than a
    /// storage failure.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleTransition { .. })
    }

    /// Whether retrying the same write could succeed. Lost races, missing
    /// rows, and rejected input are final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::StaleTransition { .. } | Self::NotFound { .. } | Self::InvalidState(_)
        )
    }
}
