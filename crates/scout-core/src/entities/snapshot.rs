use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One role from a profile's work history.
///
/// `start` and `end` carry month precision (always the first of the month).
/// A missing `end` marks the role as ongoing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub company_linkedin_url: Option<String>,
}

impl ExperienceEntry {
    /// Whether the role has no end month.
    #[must_use]
    pub const fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }

    /// Identity used to match roles across snapshots: `(company, title)`
    /// trimmed and case-folded.
    #[must_use]
    pub fn identity(&self) -> (String, String) {
        (normalize(&self.company), normalize(&self.title))
    }

    /// Short human label such as `founder @ Acme`.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.title.trim(), self.company.trim()) {
            ("", "") => "(unknown role)".to_string(),
            ("", company) => format!("(untitled) @ {company}"),
            (title, "") => title.to_string(),
            (title, company) => format!("{title} @ {company}"),
        }
    }
}

/// One entry from a profile's education history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Immutable view of a professional profile as returned by the provider.
///
/// Replaced wholesale on accepted refreshes. Lists keep provider order,
/// which is newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub linkedin_url: String,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub follower_count: Option<i64>,
    pub connection_count: Option<i64>,
    #[serde(default)]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(default)]
    pub educations: Vec<EducationEntry>,
}

impl ProfileSnapshot {
    /// The role the differ treats as current. See [`crate::diff::most_recent_role`].
    #[must_use]
    pub fn most_recent_role(&self) -> Option<&ExperienceEntry> {
        crate::diff::most_recent_role(&self.experiences)
    }
}

pub(crate) fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
