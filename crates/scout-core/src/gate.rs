//! Approval gate.
//!
//! Per-attempt state machine deciding whether a classifier proposal is
//! accepted automatically, waits for a human, or changes nothing.
//!
//! ```text
//! PendingClassification --Classified--> NoChange | AutoApproved | PendingHumanReview
//! PendingHumanReview --HumanApproved--> HumanApproved | NoChange
//! PendingHumanReview --HumanRejected--> NoChange
//! ```
//!
//! Every other `(state, event)` pair is rejected. Given the same current
//! status and event sequence the gate always lands in the same state.

use std::fmt;

use crate::enums::{ConfidenceLabel, DecisionSource, ProfileStatus};
use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    PendingClassification,
    NoChange,
    AutoApproved,
    PendingHumanReview,
    HumanApproved,
}

impl GateState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingClassification => "pending_classification",
            Self::NoChange => "no_change",
            Self::AutoApproved => "auto_approved",
            Self::PendingHumanReview => "pending_human_review",
            Self::HumanApproved => "human_approved",
        }
    }

    /// Whether reaching this state means a transition must be recorded.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::AutoApproved | Self::HumanApproved)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// The classifier proposed a status.
    Classified {
        candidate: ProfileStatus,
        confidence: ConfidenceLabel,
    },
    /// A reviewer accepted the proposal, optionally with a different status.
    HumanApproved {
        override_status: Option<ProfileStatus>,
    },
    HumanRejected,
}

impl GateEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Classified { .. } => "classified",
            Self::HumanApproved { .. } => "human_approved",
            Self::HumanRejected => "human_rejected",
        }
    }
}

/// The status change an approved gate asks the recorder to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acceptance {
    pub old_status: ProfileStatus,
    pub new_status: ProfileStatus,
    pub confidence: ConfidenceLabel,
    pub source: DecisionSource,
}

#[derive(Debug, Clone)]
pub struct ApprovalGate {
    current_status: ProfileStatus,
    state: GateState,
    proposal: Option<(ProfileStatus, ConfidenceLabel)>,
    accepted: Option<ProfileStatus>,
}

impl ApprovalGate {
    /// A fresh gate for one refresh attempt.
    #[must_use]
    pub const fn new(current_status: ProfileStatus) -> Self {
        Self {
            current_status,
            state: GateState::PendingClassification,
            proposal: None,
            accepted: None,
        }
    }

    /// Rebuild a gate parked in `PendingHumanReview` from a stored proposal.
    #[must_use]
    pub const fn awaiting_review(
        current_status: ProfileStatus,
        candidate: ProfileStatus,
        confidence: ConfidenceLabel,
    ) -> Self {
        Self {
            current_status,
            state: GateState::PendingHumanReview,
            proposal: Some((candidate, confidence)),
            accepted: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub const fn current_status(&self) -> ProfileStatus {
        self.current_status
    }

    /// The classifier proposal seen by this gate, if any.
    #[must_use]
    pub const fn proposal(&self) -> Option<(ProfileStatus, ConfidenceLabel)> {
        self.proposal
    }

    /// Feed an event and move to the next state.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] when the current state does
    /// not accept `event`. The gate is left unchanged in that case.
    pub fn apply(&mut self, event: GateEvent) -> Result<GateState, CoreError> {
        let next = match (self.state, event) {
            (GateState::PendingClassification, GateEvent::Classified { candidate, confidence }) => {
                self.proposal = Some((candidate, confidence));
                if candidate == self.current_status {
                    GateState::NoChange
                } else if confidence == ConfidenceLabel::High {
                    self.accepted = Some(candidate);
                    GateState::AutoApproved
                } else {
                    GateState::PendingHumanReview
                }
            }
            (GateState::PendingHumanReview, GateEvent::HumanApproved { override_status }) => {
                let approved = override_status
                    .or_else(|| self.proposal.map(|(candidate, _)| candidate))
                    .unwrap_or(self.current_status);
                if approved == self.current_status {
                    GateState::NoChange
                } else {
                    self.accepted = Some(approved);
                    GateState::HumanApproved
                }
            }
            (GateState::PendingHumanReview, GateEvent::HumanRejected) => GateState::NoChange,
            (state, event) => {
                return Err(CoreError::InvalidTransition {
                    state: state.to_string(),
                    event: event.name().to_string(),
                });
            }
        };
        tracing::debug!(from = %self.state, to = %next, event = event.name(), "gate transition");
        self.state = next;
        Ok(next)
    }

    /// What to record once the gate is approved. `None` in any other state.
    ///
    /// Human approvals are recorded with `high` confidence.
    #[must_use]
    pub fn acceptance(&self) -> Option<Acceptance> {
        let new_status = self.accepted?;
        match self.state {
            GateState::AutoApproved => Some(Acceptance {
                old_status: self.current_status,
                new_status,
                confidence: self.proposal.map_or(ConfidenceLabel::High, |(_, c)| c),
                source: DecisionSource::Auto,
            }),
            GateState::HumanApproved => Some(Acceptance {
                old_status: self.current_status,
                new_status,
                confidence: ConfidenceLabel::High,
                source: DecisionSource::Human,
            }),
            _ => None,
        }
    }
}
