//! Refresh orchestrator.
//!
//! Drives fetch, diff, classify, gate, and record for each due profile on a
//! bounded pool of workers. A failure inside one profile's unit of work is
//! written to that profile's `refresh_status` and reported in the batch
//! outcome. A store failure that survives its retry aborts the whole batch.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;

use scout_config::RefreshConfig;
use scout_core::diff::diff;
use scout_core::entities::{
    ChangeDescriptor, NewTransition, PendingReview, ProfileRecord, ProfileRef, ProfileSnapshot,
};
use scout_core::enums::{
    ConfidenceLabel, DecisionSource, ProfileKind, ProfileStatus, RefreshStatus,
};
use scout_core::gate::{Acceptance, ApprovalGate, GateEvent, GateState};
use scout_core::signals::{is_repeat_founder, is_senior_operator};
use scout_db::repos::DueFilter;
use scout_db::service::ScoutService;

use crate::classifier::StatusClassifier;
use crate::error::RefreshError;
use crate::retry::RetryPolicy;
use crate::traits::{ProfileFetcher, StatusModel};

/// Selection knobs for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub kind: Option<ProfileKind>,
    pub company: Option<String>,
    /// Overrides `refresh.batch_limit`.
    pub limit: Option<u32>,
    /// Ignore the staleness threshold. Unrefreshable profiles stay excluded.
    pub force: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Consult the model only on a material change.
    #[default]
    Normal,
    /// Consult the model even when nothing changed.
    Reclassify,
}

/// A human decision on an outstanding review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve {
        override_status: Option<ProfileStatus>,
    },
    Reject,
}

/// What happened to one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Snapshot refreshed, status kept.
    Unchanged,
    /// A transition was recorded.
    Approved {
        transition_id: i64,
        old_status: ProfileStatus,
        new_status: ProfileStatus,
        confidence: ConfidenceLabel,
        source: DecisionSource,
    },
    /// The proposal waits for a human.
    PendingReview {
        candidate_status: ProfileStatus,
        confidence: ConfidenceLabel,
    },
    /// A reviewer closed the proposal without a status change.
    Dismissed,
    Failed {
        refresh_status: RefreshStatus,
        reason: String,
    },
    /// Another writer changed the status first.
    Stale { expected_status: ProfileStatus },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileOutcome {
    pub profile: ProfileRef,
    pub linkedin_url: String,
    /// Role change summary when a fresh snapshot was fetched.
    pub change_summary: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ProfileOutcome {
    fn new(record: &ProfileRecord, change: Option<&ChangeDescriptor>, outcome: Outcome) -> Self {
        Self {
            profile: record.profile_ref(),
            linkedin_url: record.linkedin_url.clone(),
            change_summary: change.map(ChangeDescriptor::summary),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    pub processed: usize,
    pub unchanged: usize,
    pub auto_approved: usize,
    pub pending_review: usize,
    pub failed: usize,
    pub stale: usize,
}

impl BatchCounts {
    fn tally(&mut self, outcome: &Outcome) {
        self.processed += 1;
        match outcome {
            Outcome::Unchanged | Outcome::Dismissed => self.unchanged += 1,
            Outcome::Approved { .. } => self.auto_approved += 1,
            Outcome::PendingReview { .. } => self.pending_review += 1,
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::Stale { .. } => self.stale += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub counts: BatchCounts,
    /// Sorted by profile kind, then id.
    pub outcomes: Vec<ProfileOutcome>,
}

pub struct RefreshOrchestrator {
    store: Arc<ScoutService>,
    fetcher: Arc<dyn ProfileFetcher>,
    classifier: StatusClassifier,
    config: RefreshConfig,
    retry: RetryPolicy,
}

impl RefreshOrchestrator {
    #[must_use]
    pub fn new(
        store: Arc<ScoutService>,
        fetcher: Arc<dyn ProfileFetcher>,
        model: Arc<dyn StatusModel>,
        config: RefreshConfig,
    ) -> Self {
        let classifier = StatusClassifier::new(model, config.reference_companies.clone());
        let retry = RetryPolicy::from_config(&config);
        Self {
            store,
            fetcher,
            classifier,
            config,
            retry,
        }
    }

    /// Replace the retry policy derived from the config.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<ScoutService> {
        &self.store
    }

    /// Refresh every due profile.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Persistence`] when a store write fails twice.
    /// In-flight profiles are dropped and retried on the next run.
    #[tracing::instrument(level = "info", skip(self), fields(force = options.force))]
    pub async fn run_batch(&self, options: &BatchOptions) -> Result<BatchReport, RefreshError> {
        let started_at = Utc::now();
        let stale_before = if options.force {
            None
        } else {
            let window = TimeDelta::from_std(self.config.staleness()).unwrap_or(TimeDelta::MAX);
            Some(
                started_at
                    .checked_sub_signed(window)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC),
            )
        };
        let filter = DueFilter {
            kind: options.kind,
            company: options.company.clone(),
            stale_before,
            limit: Some(options.limit.unwrap_or(self.config.batch_limit)),
        };

        let due = self.store.list_due_profiles(&filter).await?;
        tracing::info!(due = due.len(), "selected profiles for refresh");

        let mut outcomes: Vec<ProfileOutcome> = stream::iter(due)
            .map(|record| self.process(record, RefreshMode::Normal))
            .buffer_unordered(self.config.max_concurrency.max(1))
            .try_collect()
            .await?;
        outcomes.sort_by_key(|o| (o.profile.kind.as_str(), o.profile.id));

        let mut counts = BatchCounts::default();
        for outcome in &outcomes {
            counts.tally(&outcome.outcome);
        }
        tracing::info!(
            processed = counts.processed,
            auto_approved = counts.auto_approved,
            pending_review = counts.pending_review,
            failed = counts.failed,
            stale = counts.stale,
            "refresh batch finished"
        );

        Ok(BatchReport {
            started_at,
            finished_at: Utc::now(),
            counts,
            outcomes,
        })
    }

    /// Refresh a single profile regardless of staleness.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::ProfileNotFound`] for an unknown profile and
    /// [`RefreshError::Persistence`] when a store write fails twice.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn refresh_one(
        &self,
        profile: ProfileRef,
        mode: RefreshMode,
    ) -> Result<ProfileOutcome, RefreshError> {
        let record = self.store.get_profile(profile).await?;
        self.process(record, mode).await
    }

    /// Apply a human decision to an outstanding review.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::NoPendingReview`] when nothing awaits review,
    /// [`RefreshError::ProfileNotFound`] for an unknown profile, and
    /// [`RefreshError::Persistence`] when a store write fails twice.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn resolve_review(
        &self,
        profile: ProfileRef,
        decision: ReviewDecision,
    ) -> Result<ProfileOutcome, RefreshError> {
        let record = self.store.get_profile(profile).await?;
        let Some(review) = record.pending_review.clone() else {
            return Err(RefreshError::NoPendingReview { profile });
        };

        let mut gate = ApprovalGate::awaiting_review(
            record.profile_status,
            review.candidate_status,
            review.confidence,
        );
        gate.apply(match decision {
            ReviewDecision::Approve { override_status } => {
                GateEvent::HumanApproved { override_status }
            }
            ReviewDecision::Reject => GateEvent::HumanRejected,
        })?;

        let outcome = if let Some(acceptance) = gate.acceptance() {
            self.record(&record, acceptance, review.change.clone(), None)
                .await?
        } else {
            let store = self.store.as_ref();
            self.retry
                .persist(move || store.clear_pending_review(profile, RefreshStatus::Success))
                .await?;
            tracing::info!(%profile, "review dismissed");
            Outcome::Dismissed
        };
        Ok(ProfileOutcome::new(&record, Some(&review.change), outcome))
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, record),
        fields(profile = %record.profile_ref(), status = %record.profile_status)
    )]
    async fn process(
        &self,
        record: ProfileRecord,
        mode: RefreshMode,
    ) -> Result<ProfileOutcome, RefreshError> {
        let profile = record.profile_ref();

        let fresh = match self.retry.fetch(self.fetcher.as_ref(), &record.linkedin_url).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                let refresh_status = error.refresh_status();
                tracing::warn!(%error, %refresh_status, "fetch failed");
                self.mark(profile, refresh_status).await?;
                return Ok(ProfileOutcome::new(
                    &record,
                    None,
                    Outcome::Failed {
                        refresh_status,
                        reason: error.to_string(),
                    },
                ));
            }
        };

        let change = diff(&record.snapshot, &fresh);
        let observed = ProfileRecord {
            is_repeat_founder: is_repeat_founder(&fresh),
            is_senior_operator: record.is_senior_operator
                || is_senior_operator(&fresh, Utc::now().date_naive()),
            snapshot: fresh.clone(),
            ..record.clone()
        };
        let references = self.classifier.reference_companies(&record.tracked_company);
        let verdict = match mode {
            RefreshMode::Normal => self.classifier.classify(&observed, &change, &references).await,
            RefreshMode::Reclassify => {
                self.classifier
                    .reclassify(&observed, &change, &references)
                    .await
            }
        };
        let verdict = match verdict {
            Ok(verdict) => verdict,
            Err(error) => {
                tracing::warn!(%error, "classification failed");
                self.mark(profile, RefreshStatus::ClassificationFailed)
                    .await?;
                return Ok(ProfileOutcome::new(
                    &record,
                    Some(&change),
                    Outcome::Failed {
                        refresh_status: RefreshStatus::ClassificationFailed,
                        reason: error.to_string(),
                    },
                ));
            }
        };

        let mut gate = ApprovalGate::new(record.profile_status);
        let state = gate.apply(GateEvent::Classified {
            candidate: verdict.status,
            confidence: verdict.confidence,
        })?;

        let outcome = if let Some(acceptance) = gate.acceptance() {
            self.record(&record, acceptance, change.clone(), Some(fresh))
                .await?
        } else if state == GateState::PendingHumanReview {
            let review = PendingReview {
                candidate_status: verdict.status,
                confidence: verdict.confidence,
                change: change.clone(),
                proposed_at: Utc::now(),
            };
            let store = self.store.as_ref();
            let (fresh, review_ref) = (&fresh, &review);
            self.retry
                .persist(move || store.flag_pending_review(profile, fresh, review_ref))
                .await?;
            tracing::info!(
                candidate = %verdict.status,
                confidence = %verdict.confidence,
                "proposal parked for human review"
            );
            Outcome::PendingReview {
                candidate_status: verdict.status,
                confidence: verdict.confidence,
            }
        } else {
            // An outstanding review survives runs that change nothing.
            let refresh_status = if record.pending_review.is_some() {
                RefreshStatus::PendingReview
            } else {
                RefreshStatus::Success
            };
            let store = self.store.as_ref();
            let fresh = &fresh;
            self.retry
                .persist(move || store.store_snapshot(profile, fresh, refresh_status))
                .await?;
            Outcome::Unchanged
        };

        Ok(ProfileOutcome::new(&record, Some(&change), outcome))
    }

    async fn record(
        &self,
        record: &ProfileRecord,
        acceptance: Acceptance,
        change: ChangeDescriptor,
        snapshot: Option<ProfileSnapshot>,
    ) -> Result<Outcome, RefreshError> {
        let profile = record.profile_ref();
        let transition = NewTransition {
            profile,
            old_status: acceptance.old_status,
            new_status: acceptance.new_status,
            confidence: acceptance.confidence,
            change,
            source: acceptance.source,
            snapshot,
        };
        let store = self.store.as_ref();
        let pending = &transition;
        match self
            .retry
            .persist(move || store.record_transition(pending))
            .await
        {
            Ok(row) => {
                tracing::info!(
                    transition_id = row.id,
                    old = %row.old_status,
                    new = %row.new_status,
                    source = %row.source,
                    "status transition recorded"
                );
                Ok(Outcome::Approved {
                    transition_id: row.id,
                    old_status: row.old_status,
                    new_status: row.new_status,
                    confidence: row.confidence,
                    source: row.source,
                })
            }
            Err(error) if error.is_stale() => {
                tracing::warn!(%error, "status changed underneath this attempt");
                self.mark(profile, RefreshStatus::StaleConflict).await?;
                Ok(Outcome::Stale {
                    expected_status: acceptance.old_status,
                })
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn mark(&self, profile: ProfileRef, refresh_status: RefreshStatus) -> Result<(), RefreshError> {
        let store = self.store.as_ref();
        self.retry
            .persist(move || store.mark_refresh_attempt(profile, refresh_status))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_tally_by_outcome() {
        let mut counts = BatchCounts::default();
        counts.tally(&Outcome::Unchanged);
        counts.tally(&Outcome::PendingReview {
            candidate_status: ProfileStatus::Stealth,
            confidence: ConfidenceLabel::Low,
        });
        counts.tally(&Outcome::Failed {
            refresh_status: RefreshStatus::FetchFailed,
            reason: "timeout".into(),
        });
        counts.tally(&Outcome::Stale {
            expected_status: ProfileStatus::Stealth,
        });
        assert_eq!(
            counts,
            BatchCounts {
                processed: 4,
                unchanged: 1,
                auto_approved: 0,
                pending_review: 1,
                failed: 1,
                stale: 1,
            }
        );
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let outcome = ProfileOutcome {
            profile: ProfileRef::new(ProfileKind::StealthFounder, 3),
            linkedin_url: "https://www.linkedin.com/in/x".into(),
            change_summary: None,
            outcome: Outcome::Stale {
                expected_status: ProfileStatus::Stealth,
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "stale");
        assert_eq!(json["expected_status"], "stealth");
        assert_eq!(json["profile"]["kind"], "stealth_founder");
    }
}
