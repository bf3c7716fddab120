use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ChangeDescriptor, ExperienceEntry, ProfileRef, ProfileSnapshot};
use crate::enums::{ConfidenceLabel, DecisionSource, ProfileStatus};

/// An accepted status change. Append-only: never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusTransition {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub profile: ProfileRef,
    pub linkedin_url: String,
    pub old_status: ProfileStatus,
    pub new_status: ProfileStatus,
    pub confidence: ConfidenceLabel,
    pub change: ChangeDescriptor,
    pub previous_role: Option<ExperienceEntry>,
    pub current_role: Option<ExperienceEntry>,
    pub source: DecisionSource,
}

/// Request to record a transition.
///
/// `old_status` is the status the caller observed; recording fails as stale
/// when the profile has moved on since. When `snapshot` is set it replaces
/// the stored snapshot in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransition {
    pub profile: ProfileRef,
    pub old_status: ProfileStatus,
    pub new_status: ProfileStatus,
    pub confidence: ConfidenceLabel,
    pub change: ChangeDescriptor,
    pub source: DecisionSource,
    pub snapshot: Option<ProfileSnapshot>,
}
