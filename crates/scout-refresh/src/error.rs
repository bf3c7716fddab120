//! Error types for the refresh pipeline and its collaborators.

use scout_core::entities::ProfileRef;
use scout_core::enums::RefreshStatus;
use scout_core::errors::CoreError;
use scout_db::error::DatabaseError;
use thiserror::Error;

/// Failure reported by a [`crate::traits::ProfileFetcher`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The provider answered 429. `retry_after_secs` comes from `Retry-After`.
    #[error("rate limited (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The profile does not exist at the provider.
    #[error("profile not found at provider")]
    NotFound,

    #[error("provider request timed out")]
    Timeout,

    /// Non-success status other than 404 and 429.
    #[error("provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered with a body we could not map to a snapshot.
    #[error("provider response parse error: {0}")]
    Parse(String),

    /// Connection-level failure before any response arrived.
    #[error("provider transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Refresh marker recorded when this error ends an attempt.
    #[must_use]
    pub const fn refresh_status(&self) -> RefreshStatus {
        match self {
            Self::NotFound => RefreshStatus::Unrefreshable,
            _ => RefreshStatus::FetchFailed,
        }
    }
}

/// Failure reported by a [`crate::traits::StatusModel`]. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("classification model returned an empty response")]
    EmptyResponse,

    /// The reply did not match the expected `STATUS|CONFIDENCE` contract.
    #[error("malformed classification response: {reply:?}")]
    Malformed { reply: String },

    #[error("classification API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("classification transport error: {0}")]
    Transport(String),
}

/// Errors that stop an orchestrator operation as a whole.
///
/// Per-profile failures never surface here; they are recorded on the
/// profile and reported in the batch outcome.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// A store write kept failing after its retry. The batch is aborted.
    #[error("persistence failure: {0}")]
    Persistence(#[source] DatabaseError),

    #[error("profile not found: {profile}")]
    ProfileNotFound { profile: ProfileRef },

    #[error("no pending review for {profile}")]
    NoPendingReview { profile: ProfileRef },

    /// The approval gate rejected an event.
    #[error(transparent)]
    Gate(#[from] CoreError),
}

impl From<DatabaseError> for RefreshError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { profile } => Self::ProfileNotFound { profile },
            other => Self::Persistence(other),
        }
    }
}
