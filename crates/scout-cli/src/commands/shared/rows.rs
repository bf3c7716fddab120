//! Flat row shapes for `--format table`.

use serde::Serialize;

use scout_core::entities::{ProfileRecord, StatusTransition};
use scout_refresh::{Outcome, ProfileOutcome};

#[derive(Debug, Serialize)]
pub struct OutcomeRow {
    pub profile: String,
    pub outcome: &'static str,
    pub detail: String,
    pub change: String,
}

impl From<&ProfileOutcome> for OutcomeRow {
    fn from(outcome: &ProfileOutcome) -> Self {
        let (name, detail) = match &outcome.outcome {
            Outcome::Unchanged => ("unchanged", String::new()),
            Outcome::Approved {
                old_status,
                new_status,
                confidence,
                source,
                ..
            } => (
                "approved",
                format!("{old_status} -> {new_status} ({confidence}, {source})"),
            ),
            Outcome::PendingReview {
                candidate_status,
                confidence,
            } => ("pending_review", format!("{candidate_status} ({confidence})")),
            Outcome::Dismissed => ("dismissed", String::new()),
            Outcome::Failed {
                refresh_status,
                reason,
            } => ("failed", format!("{refresh_status}: {reason}")),
            Outcome::Stale { expected_status } => {
                ("stale", format!("expected {expected_status}"))
            }
        };
        Self {
            profile: outcome.profile.to_string(),
            outcome: name,
            detail,
            change: outcome.change_summary.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewRow {
    pub profile: String,
    pub linkedin_url: String,
    pub status: String,
    pub candidate: String,
    pub proposed_at: String,
    pub change: String,
}

impl ReviewRow {
    pub fn from_record(record: &ProfileRecord) -> Option<Self> {
        let review = record.pending_review.as_ref()?;
        Some(Self {
            profile: record.profile_ref().to_string(),
            linkedin_url: record.linkedin_url.clone(),
            status: record.profile_status.to_string(),
            candidate: format!("{} ({})", review.candidate_status, review.confidence),
            proposed_at: review.proposed_at.format("%Y-%m-%d %H:%M").to_string(),
            change: review.change.summary(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TransitionRow {
    pub id: i64,
    pub at: String,
    pub profile: String,
    pub transition: String,
    pub confidence: String,
    pub source: String,
    pub current_role: String,
}

impl From<&StatusTransition> for TransitionRow {
    fn from(transition: &StatusTransition) -> Self {
        Self {
            id: transition.id,
            at: transition.created_at.format("%Y-%m-%d %H:%M").to_string(),
            profile: transition.profile.to_string(),
            transition: format!("{} -> {}", transition.old_status, transition.new_status),
            confidence: transition.confidence.to_string(),
            source: transition.source.to_string(),
            current_role: transition
                .current_role
                .as_ref()
                .map(scout_core::entities::ExperienceEntry::label)
                .unwrap_or_default(),
        }
    }
}
