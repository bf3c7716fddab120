//! Collaborator seams: the profile fetcher and the status model.
//!
//! Both are injected as trait objects so the pipeline can run against real
//! providers (`scout-providers`) or deterministic stubs in tests.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;

use scout_core::entities::{ExperienceEntry, ProfileRef, ProfileSnapshot};
use scout_core::enums::{ConfidenceLabel, ProfileStatus};

use crate::error::{ClassificationError, FetchError};

/// Fetches a fresh snapshot for a LinkedIn profile URL.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, linkedin_url: &str) -> Result<ProfileSnapshot, FetchError>;
}

/// Makes the judgment call on a profile's status.
#[async_trait]
pub trait StatusModel: Send + Sync {
    async fn classify_request(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ModelVerdict, ClassificationError>;
}

/// Operator and founder flags passed to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleSignals {
    pub is_senior_operator: bool,
    pub is_repeat_founder: bool,
}

/// Everything the model sees about one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRequest {
    pub profile: ProfileRef,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub current_status: ProfileStatus,
    pub current_role: Option<ExperienceEntry>,
    pub prior_role: Option<ExperienceEntry>,
    pub reference_companies: BTreeSet<String>,
    pub signals: RoleSignals,
}

/// The model's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelVerdict {
    pub status: ProfileStatus,
    pub confidence: ConfidenceLabel,
}
