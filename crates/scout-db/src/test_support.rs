//! Shared test utilities for scout-db unit tests.

pub(crate) mod helpers {
    use chrono::NaiveDate;
    use scout_core::entities::{ExperienceEntry, NewProfile, ProfileSnapshot};
    use scout_core::enums::{ConfidenceLabel, ProfileKind, ProfileStatus};

    use crate::service::ScoutService;

    /// In-memory service with migrations applied.
    pub async fn test_service() -> ScoutService {
        ScoutService::new_local(":memory:").await.unwrap()
    }

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

    pub fn new_profile(kind: ProfileKind, url: &str, status: ProfileStatus) -> NewProfile {
        NewProfile {
            kind,
            tracked_company: "Acme".into(),
            snapshot: ProfileSnapshot {
                linkedin_url: url.into(),
                full_name: Some("Jane Doe".into()),
                headline: Some("Engineer at Acme".into()),
                location: Some("Berlin".into()),
                follower_count: Some(320),
                connection_count: Some(280),
                experiences: vec![role("Acme", "Engineer", Some((2019, 5)), None)],
                educations: Vec::new(),
            },
            profile_status: status,
            status_confidence_label: Some(ConfidenceLabel::High),
            is_senior_operator: false,
        }
    }
}
