//! RapidAPI fresh-linkedin-profile-data client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use scout_config::FetcherConfig;
use scout_core::dates::{DateRange, parse_date_range};
use scout_core::entities::{EducationEntry, ExperienceEntry, ProfileSnapshot};
use scout_refresh::{FetchError, ProfileFetcher};

use crate::http::check_response;

const PROFILE_PATH: &str = "/get-linkedin-profile";

/// Sections the pipeline never reads.
const EXCLUDED_SECTIONS: [&str; 10] = [
    "include_skills",
    "include_certifications",
    "include_publications",
    "include_honors",
    "include_volunteers",
    "include_projects",
    "include_patents",
    "include_courses",
    "include_organizations",
    "include_company_public_url",
];

#[derive(Deserialize)]
struct ProfileEnvelope {
    data: Option<RawProfile>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawProfile {
    first_name: Option<String>,
    last_name: Option<String>,
    full_name: Option<String>,
    headline: Option<String>,
    location: Option<String>,
    /// Numbers, numeric strings, or empty strings depending on the profile.
    follower_count: Value,
    connection_count: Value,
    experiences: Option<Vec<RawExperience>>,
    educations: Option<Vec<RawEducation>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawExperience {
    company: Option<String>,
    company_linkedin_url: Option<String>,
    date_range: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawEducation {
    school: Option<String>,
    degree: Option<String>,
    field_of_study: Option<String>,
    date_range: Option<String>,
}

pub struct RapidApiFetcher {
    http: reqwest::Client,
    config: FetcherConfig,
}

impl RapidApiFetcher {
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("scout/0.1")
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{PROFILE_PATH}", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProfileFetcher for RapidApiFetcher {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_profile(&self, linkedin_url: &str) -> Result<ProfileSnapshot, FetchError> {
        let mut query: Vec<(&str, &str)> = vec![("linkedin_url", linkedin_url)];
        query.extend(EXCLUDED_SECTIONS.iter().map(|flag| (*flag, "false")));

        let resp = self
            .http
            .get(self.endpoint())
            .header("x-rapidapi-key", &self.config.api_key)
            .header("x-rapidapi-host", &self.config.host)
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_response(resp).await?;
        let body = resp.text().await.map_err(transport_error)?;
        let snapshot = parse_profile(&body, linkedin_url)?;
        tracing::debug!(
            experiences = snapshot.experiences.len(),
            educations = snapshot.educations.len(),
            "fetched profile"
        );
        Ok(snapshot)
    }
}

fn transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(error.to_string())
    }
}

/// Map a provider response body to a snapshot keyed by `linkedin_url`.
///
/// Unparseable date ranges leave the entry undated instead of failing the
/// whole profile.
fn parse_profile(body: &str, linkedin_url: &str) -> Result<ProfileSnapshot, FetchError> {
    let envelope: ProfileEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    let raw = envelope
        .data
        .ok_or_else(|| FetchError::Parse("response has no profile data".into()))?;

    let full_name = non_empty(raw.full_name).or_else(|| {
        let joined = [raw.first_name, raw.last_name]
            .into_iter()
            .flatten()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        non_empty(Some(joined))
    });

    Ok(ProfileSnapshot {
        linkedin_url: linkedin_url.to_string(),
        full_name,
        headline: non_empty(raw.headline),
        location: non_empty(raw.location),
        follower_count: count(&raw.follower_count),
        connection_count: count(&raw.connection_count),
        experiences: raw
            .experiences
            .unwrap_or_default()
            .into_iter()
            .map(|exp| {
                let range = date_range(exp.date_range.as_deref());
                ExperienceEntry {
                    company: exp.company.unwrap_or_default().trim().to_string(),
                    title: exp.title.unwrap_or_default().trim().to_string(),
                    start: range.start,
                    end: range.end,
                    company_linkedin_url: non_empty(exp.company_linkedin_url),
                }
            })
            .collect(),
        educations: raw
            .educations
            .unwrap_or_default()
            .into_iter()
            .map(|edu| {
                let range = date_range(edu.date_range.as_deref());
                EducationEntry {
                    school: edu.school.unwrap_or_default().trim().to_string(),
                    degree: non_empty(edu.degree),
                    field_of_study: non_empty(edu.field_of_study),
                    start: range.start,
                    end: range.end,
                }
            })
            .collect(),
    })
}

fn date_range(raw: Option<&str>) -> DateRange {
    let raw = raw.unwrap_or_default();
    parse_date_range(raw).unwrap_or_else(|error| {
        tracing::warn!(raw, %error, "unparseable date range, leaving entry undated");
        DateRange::default()
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}
