//! Serde roundtrip and JsonSchema validation tests for persisted entity types.

use chrono::{NaiveDate, Utc};
use schemars::schema_for;
use scout_core::diff::diff;
use scout_core::entities::*;
use scout_core::enums::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn ym(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn engineer_at_acme() -> ExperienceEntry {
    ExperienceEntry {
        company: "Acme".into(),
        title: "Staff Engineer".into(),
        start: ym(2019, 3),
        end: ym(2023, 8),
        company_linkedin_url: Some("https://www.linkedin.com/company/acme/".into()),
    }
}

fn founder_in_stealth() -> ExperienceEntry {
    ExperienceEntry {
        company: "Stealth Startup".into(),
        title: "Founder".into(),
        start: ym(2023, 9),
        end: None,
        company_linkedin_url: None,
    }
}

fn sample_snapshot(experiences: Vec<ExperienceEntry>) -> ProfileSnapshot {
    ProfileSnapshot {
        linkedin_url: "https://www.linkedin.com/in/jane-doe/".into(),
        full_name: Some("Jane Doe".into()),
        headline: Some("Building something new".into()),
        location: Some("San Francisco Bay Area".into()),
        follower_count: Some(1_204),
        connection_count: Some(500),
        experiences,
        educations: vec![EducationEntry {
            school: "State University".into(),
            degree: Some("BSc".into()),
            field_of_study: Some("Computer Science".into()),
            start: ym(2011, 9),
            end: ym(2015, 6),
        }],
    }
}

fn sample_change() -> ChangeDescriptor {
    diff(
        &sample_snapshot(vec![engineer_at_acme()]),
        &sample_snapshot(vec![founder_in_stealth(), engineer_at_acme()]),
    )
}

roundtrip_and_validate!(
    snapshot_roundtrip,
    ProfileSnapshot,
    sample_snapshot(vec![founder_in_stealth(), engineer_at_acme()])
);

roundtrip_and_validate!(change_descriptor_roundtrip, ChangeDescriptor, sample_change());

roundtrip_and_validate!(
    change_descriptor_with_delta_roundtrip,
    ChangeDescriptor,
    ChangeDescriptor {
        deltas: vec![RoleDelta {
            previous: engineer_at_acme(),
            current: ExperienceEntry {
                title: "Co-Founder".into(),
                ..engineer_at_acme()
            },
            company_changed: false,
            title_changed: true,
        }],
        previous_role: Some(engineer_at_acme()),
        current_role: Some(founder_in_stealth()),
        material_change: true,
        ..ChangeDescriptor::default()
    }
);

roundtrip_and_validate!(
    profile_record_roundtrip,
    ProfileRecord,
    ProfileRecord {
        id: 7,
        kind: ProfileKind::CurrentEmployee,
        linkedin_url: "https://www.linkedin.com/in/jane-doe/".into(),
        tracked_company: "Acme".into(),
        snapshot: sample_snapshot(vec![engineer_at_acme()]),
        profile_status: ProfileStatus::CurrentlyEmployed,
        refresh_status: RefreshStatus::PendingReview,
        status_confidence_label: Some(ConfidenceLabel::High),
        last_attempted_refresh_timestamp: Some(Utc::now()),
        is_senior_operator: true,
        is_repeat_founder: false,
        pending_review: Some(PendingReview {
            candidate_status: ProfileStatus::Stealth,
            confidence: ConfidenceLabel::Medium,
            change: sample_change(),
            proposed_at: Utc::now(),
        }),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    status_transition_roundtrip,
    StatusTransition,
    StatusTransition {
        id: 1,
        created_at: Utc::now(),
        profile: ProfileRef::new(ProfileKind::StealthFounder, 3),
        linkedin_url: "https://www.linkedin.com/in/jane-doe/".into(),
        old_status: ProfileStatus::RecentlyQuit,
        new_status: ProfileStatus::Stealth,
        confidence: ConfidenceLabel::High,
        change: sample_change(),
        previous_role: Some(engineer_at_acme()),
        current_role: Some(founder_in_stealth()),
        source: DecisionSource::Auto,
    }
);

#[test]
fn profile_ref_display() {
    assert_eq!(
        ProfileRef::new(ProfileKind::StealthFounder, 42).to_string(),
        "stealth_founder#42"
    );
}

#[test]
fn change_summary_lists_added_roles() {
    assert_eq!(
        sample_change().summary(),
        "added: Founder @ Stealth Startup"
    );
    assert_eq!(ChangeDescriptor::default().summary(), "no role changes");
}
