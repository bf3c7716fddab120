//! Status classifier.
//!
//! Short-circuits when the work history did not materially change and
//! otherwise hands the judgment call to the injected [`StatusModel`].

use std::collections::BTreeSet;
use std::sync::Arc;

use scout_core::entities::{ChangeDescriptor, ProfileRecord};
use scout_core::enums::ConfidenceLabel;
use scout_core::signals::reference_companies;

use crate::error::ClassificationError;
use crate::traits::{ClassificationRequest, ModelVerdict, RoleSignals, StatusModel};

pub struct StatusClassifier {
    model: Arc<dyn StatusModel>,
    extra_reference_companies: Vec<String>,
}

impl StatusClassifier {
    #[must_use]
    pub fn new(model: Arc<dyn StatusModel>, extra_reference_companies: Vec<String>) -> Self {
        Self {
            model,
            extra_reference_companies,
        }
    }

    /// The tracked company plus the configured extra reference companies.
    #[must_use]
    pub fn reference_companies(&self, tracked_company: &str) -> BTreeSet<String> {
        reference_companies(tracked_company, &self.extra_reference_companies)
    }

    /// Derive `(status, confidence)` for `record` given what changed.
    ///
    /// Without a material change the current status is kept at `high`
    /// confidence and the model is not consulted.
    ///
    /// # Errors
    ///
    /// Propagates the model's [`ClassificationError`] unchanged.
    pub async fn classify(
        &self,
        record: &ProfileRecord,
        change: &ChangeDescriptor,
        references: &BTreeSet<String>,
    ) -> Result<ModelVerdict, ClassificationError> {
        if !change.material_change {
            tracing::debug!(profile = %record.profile_ref(), "no material change, keeping status");
            return Ok(ModelVerdict {
                status: record.profile_status,
                confidence: ConfidenceLabel::High,
            });
        }
        self.reclassify(record, change, references).await
    }

    /// Ask the model regardless of whether anything changed.
    ///
    /// # Errors
    ///
    /// Propagates the model's [`ClassificationError`] unchanged.
    pub async fn reclassify(
        &self,
        record: &ProfileRecord,
        change: &ChangeDescriptor,
        references: &BTreeSet<String>,
    ) -> Result<ModelVerdict, ClassificationError> {
        let request = build_request(record, change, references);
        let verdict = self.model.classify_request(&request).await?;
        tracing::debug!(
            profile = %request.profile,
            status = %verdict.status,
            confidence = %verdict.confidence,
            "model verdict"
        );
        Ok(verdict)
    }
}

fn build_request(
    record: &ProfileRecord,
    change: &ChangeDescriptor,
    references: &BTreeSet<String>,
) -> ClassificationRequest {
    ClassificationRequest {
        profile: record.profile_ref(),
        full_name: record.snapshot.full_name.clone(),
        headline: record.snapshot.headline.clone(),
        current_status: record.profile_status,
        current_role: change
            .current_role
            .clone()
            .or_else(|| record.current_role().cloned()),
        prior_role: change.previous_role.clone(),
        reference_companies: references.clone(),
        signals: RoleSignals {
            is_senior_operator: record.is_senior_operator,
            is_repeat_founder: record.is_repeat_founder,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use scout_core::entities::{ExperienceEntry, ProfileSnapshot};
    use scout_core::enums::{ProfileKind, ProfileStatus, RefreshStatus};
    use std::sync::Mutex;

    struct Recording {
        verdict: Result<ModelVerdict, ClassificationError>,
        seen: Mutex<Vec<ClassificationRequest>>,
    }

    #[async_trait]
    impl StatusModel for Recording {
        async fn classify_request(
            &self,
            request: &ClassificationRequest,
        ) -> Result<ModelVerdict, ClassificationError> {
            self.seen.lock().unwrap().push(request.clone());
            self.verdict.clone()
        }
    }

    fn recording(verdict: Result<ModelVerdict, ClassificationError>) -> Arc<Recording> {
        Arc::new(Recording {
            verdict,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn entry(company: &str, title: &str, start: (i32, u32)) -> ExperienceEntry {
        ExperienceEntry {
            company: company.into(),
            title: title.into(),
            start: NaiveDate::from_ymd_opt(start.0, start.1, 1),
            end: None,
            company_linkedin_url: None,
        }
    }

    fn record() -> ProfileRecord {
        ProfileRecord {
            id: 7,
            kind: ProfileKind::CurrentEmployee,
            linkedin_url: "https://www.linkedin.com/in/jdoe".into(),
            tracked_company: "Acme".into(),
            snapshot: ProfileSnapshot {
                linkedin_url: "https://www.linkedin.com/in/jdoe".into(),
                headline: Some("Building something new".into()),
                experiences: vec![entry("Acme", "Engineer", (2019, 5))],
                ..ProfileSnapshot::default()
            },
            profile_status: ProfileStatus::CurrentlyEmployed,
            refresh_status: RefreshStatus::NotRefreshed,
            status_confidence_label: None,
            last_attempted_refresh_timestamp: None,
            is_senior_operator: true,
            is_repeat_founder: false,
            pending_review: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn immaterial_change_skips_the_model() {
        let model = recording(Err(ClassificationError::EmptyResponse));
        let classifier = StatusClassifier::new(model.clone(), Vec::new());
        let record = record();
        let refs = classifier.reference_companies(&record.tracked_company);

        let verdict = classifier
            .classify(&record, &ChangeDescriptor::default(), &refs)
            .await
            .unwrap();

        assert_eq!(verdict.status, ProfileStatus::CurrentlyEmployed);
        assert_eq!(verdict.confidence, ConfidenceLabel::High);
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn material_change_builds_full_request() {
        let model = recording(Ok(ModelVerdict {
            status: ProfileStatus::Stealth,
            confidence: ConfidenceLabel::Medium,
        }));
        let classifier = StatusClassifier::new(model.clone(), vec!["Globex".into()]);
        let record = record();
        let change = ChangeDescriptor {
            added: vec![entry("Stealth Startup", "Founder", (2024, 1))],
            previous_role: Some(entry("Acme", "Engineer", (2019, 5))),
            current_role: Some(entry("Stealth Startup", "Founder", (2024, 1))),
            material_change: true,
            ..ChangeDescriptor::default()
        };
        let refs = classifier.reference_companies(&record.tracked_company);

        let verdict = classifier.classify(&record, &change, &refs).await.unwrap();
        assert_eq!(verdict.status, ProfileStatus::Stealth);

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.current_role.as_ref().unwrap().company, "Stealth Startup");
        assert_eq!(request.prior_role.as_ref().unwrap().company, "Acme");
        assert!(request.reference_companies.contains("Acme"));
        assert!(request.reference_companies.contains("Globex"));
        assert!(request.signals.is_senior_operator);
        assert_eq!(request.headline.as_deref(), Some("Building something new"));
    }

    #[tokio::test]
    async fn model_errors_surface() {
        let model = recording(Err(ClassificationError::Malformed {
            reply: "maybe?".into(),
        }));
        let classifier = StatusClassifier::new(model, Vec::new());
        let record = record();
        let refs = classifier.reference_companies(&record.tracked_company);

        let err = classifier
            .reclassify(&record, &ChangeDescriptor::default(), &refs)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassificationError::Malformed { .. }));
    }

    #[tokio::test]
    async fn reclassify_falls_back_to_stored_role() {
        let model = recording(Ok(ModelVerdict {
            status: ProfileStatus::CurrentlyEmployed,
            confidence: ConfidenceLabel::High,
        }));
        let classifier = StatusClassifier::new(model.clone(), Vec::new());
        let record = record();
        let refs = classifier.reference_companies(&record.tracked_company);

        classifier
            .reclassify(&record, &ChangeDescriptor::default(), &refs)
            .await
            .unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].current_role.as_ref().unwrap().title, "Engineer");
        assert_eq!(seen[0].prior_role, None);
    }
}
