//! Scripted collaborators and seeding helpers for orchestrator tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use scout_config::RefreshConfig;
use scout_core::entities::{ExperienceEntry, NewProfile, ProfileRecord, ProfileSnapshot};
use scout_core::enums::{ConfidenceLabel, ProfileKind, ProfileStatus};
use scout_db::service::ScoutService;
use scout_refresh::{
    ClassificationError, ClassificationRequest, FetchError, ModelVerdict, ProfileFetcher,
    RefreshOrchestrator, RetryPolicy, StatusModel,
};

pub fn role(
    company: &str,
    title: &str,
    start: Option<(i32, u32)>,
    end: Option<(i32, u32)>,
) -> ExperienceEntry {
    let month = |(y, m): (i32, u32)| NaiveDate::from_ymd_opt(y, m, 1);
    ExperienceEntry {
        company: company.into(),
        title: title.into(),
        start: start.and_then(month),
        end: end.and_then(month),
        company_linkedin_url: None,
    }
}

pub fn snapshot(url: &str, experiences: Vec<ExperienceEntry>) -> ProfileSnapshot {
    ProfileSnapshot {
        linkedin_url: url.into(),
        full_name: Some("Jane Doe".into()),
        headline: Some("Engineer at Acme".into()),
        location: Some("Berlin".into()),
        follower_count: Some(320),
        connection_count: Some(280),
        experiences,
        educations: Vec::new(),
    }
}

/// The work history every seeded profile starts with.
pub fn acme_engineer() -> Vec<ExperienceEntry> {
    vec![role("Acme", "Engineer", Some((2019, 5)), None)]
}

pub async fn store() -> Arc<ScoutService> {
    Arc::new(ScoutService::new_local(":memory:").await.unwrap())
}

pub async fn seed(
    store: &ScoutService,
    kind: ProfileKind,
    url: &str,
    status: ProfileStatus,
) -> ProfileRecord {
    store
        .insert_profile(&NewProfile {
            kind,
            tracked_company: "Acme".into(),
            snapshot: snapshot(url, acme_engineer()),
            profile_status: status,
            status_confidence_label: Some(ConfidenceLabel::High),
            is_senior_operator: false,
        })
        .await
        .unwrap()
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        rate_limit_max_attempts: 3,
        timeout_retries: 1,
        persistence_retries: 1,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
    }
}

pub fn orchestrator(
    store: &Arc<ScoutService>,
    fetcher: &Arc<StubFetcher>,
    model: Arc<dyn StatusModel>,
) -> RefreshOrchestrator {
    RefreshOrchestrator::new(
        Arc::clone(store),
        Arc::clone(fetcher) as Arc<dyn ProfileFetcher>,
        model,
        RefreshConfig::default(),
    )
    .with_retry_policy(fast_retry())
}

/// Replies per URL in order; the last reply repeats once the script runs out.
#[derive(Default)]
pub struct StubFetcher {
    scripts: Mutex<HashMap<String, Vec<Result<ProfileSnapshot, FetchError>>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, url: &str, replies: Vec<Result<ProfileSnapshot, FetchError>>) {
        self.scripts.lock().unwrap().insert(url.into(), replies);
    }

    pub fn returns(&self, snapshot: ProfileSnapshot) {
        let url = snapshot.linkedin_url.clone();
        self.script(&url, vec![Ok(snapshot)]);
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ProfileFetcher for StubFetcher {
    async fn fetch_profile(&self, linkedin_url: &str) -> Result<ProfileSnapshot, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(linkedin_url.into())
            .or_default() += 1;
        let mut scripts = self.scripts.lock().unwrap();
        let Some(replies) = scripts.get_mut(linkedin_url) else {
            return Err(FetchError::NotFound);
        };
        if replies.len() > 1 {
            replies.remove(0)
        } else {
            replies[0].clone()
        }
    }
}

/// Answers every request with the same verdict and remembers what it saw.
pub struct StubModel {
    verdict: Result<ModelVerdict, ClassificationError>,
    requests: Mutex<Vec<ClassificationRequest>>,
    calls: AtomicUsize,
}

impl StubModel {
    pub fn verdict(status: ProfileStatus, confidence: ConfidenceLabel) -> Arc<Self> {
        Self::replying(Ok(ModelVerdict { status, confidence }))
    }

    pub fn failing(error: ClassificationError) -> Arc<Self> {
        Self::replying(Err(error))
    }

    fn replying(verdict: Result<ModelVerdict, ClassificationError>) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ClassificationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusModel for StubModel {
    async fn classify_request(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ModelVerdict, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.verdict.clone()
    }
}
