use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ChangeDescriptor, ExperienceEntry, ProfileSnapshot};
use crate::enums::{ConfidenceLabel, ProfileKind, ProfileStatus, RefreshStatus};

/// Address of a profile row: which table and which integer id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct ProfileRef {
    pub kind: ProfileKind,
    pub id: i64,
}

impl ProfileRef {
    #[must_use]
    pub const fn new(kind: ProfileKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for ProfileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// A classifier proposal waiting for a human decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PendingReview {
    pub candidate_status: ProfileStatus,
    pub confidence: ConfidenceLabel,
    pub change: ChangeDescriptor,
    pub proposed_at: DateTime<Utc>,
}

/// A tracked profile with its latest snapshot and pipeline bookkeeping.
///
/// `profile_status` always equals the `new_status` of the latest recorded
/// transition, or the initial classification when there is none.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProfileRecord {
    pub id: i64,
    pub kind: ProfileKind,
    pub linkedin_url: String,
    /// Search company for stealth founders, current company for employees.
    pub tracked_company: String,
    pub snapshot: ProfileSnapshot,
    pub profile_status: ProfileStatus,
    pub refresh_status: RefreshStatus,
    pub status_confidence_label: Option<ConfidenceLabel>,
    pub last_attempted_refresh_timestamp: Option<DateTime<Utc>>,
    pub is_senior_operator: bool,
    pub is_repeat_founder: bool,
    pub pending_review: Option<PendingReview>,
    pub created_at: DateTime<Utc>,
}

impl ProfileRecord {
    #[must_use]
    pub const fn profile_ref(&self) -> ProfileRef {
        ProfileRef::new(self.kind, self.id)
    }

    #[must_use]
    pub fn current_role(&self) -> Option<&ExperienceEntry> {
        self.snapshot.most_recent_role()
    }
}

/// Input for inserting a brand-new profile (initial ingestion).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewProfile {
    pub kind: ProfileKind,
    pub tracked_company: String,
    pub snapshot: ProfileSnapshot,
    pub profile_status: ProfileStatus,
    pub status_confidence_label: Option<ConfidenceLabel>,
    #[serde(default)]
    pub is_senior_operator: bool,
}
