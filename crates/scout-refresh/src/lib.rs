//! # scout-refresh
//!
//! The refresh and status-transition pipeline.
//!
//! [`RefreshOrchestrator`] selects due profiles and, per profile, fetches a
//! fresh snapshot through a [`ProfileFetcher`], diffs it against the stored
//! one, asks the [`StatusClassifier`] for a verdict, runs it through the
//! approval gate, and then either records the transition or parks the
//! proposal for human review. Per-profile failures are recorded on the
//! profile and never abort the batch; only persistent store failures do.

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod retry;
pub mod traits;

pub use classifier::StatusClassifier;
pub use error::{ClassificationError, FetchError, RefreshError};
pub use orchestrator::{
    BatchCounts, BatchOptions, BatchReport, Outcome, ProfileOutcome, RefreshMode,
    RefreshOrchestrator, ReviewDecision,
};
pub use retry::RetryPolicy;
pub use traits::{ClassificationRequest, ModelVerdict, ProfileFetcher, RoleSignals, StatusModel};
