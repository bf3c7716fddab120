//! Status enums, confidence labels, and profile kinds.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage. The string forms match the CHECK
//! constraints in the `scout-db` migrations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProfileStatus
// ---------------------------------------------------------------------------

/// Career status attributed to a tracked profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Stealth,
    CurrentlyEmployed,
    RecentlyQuit,
    BuildingInPublic,
}

impl ProfileStatus {
    pub const ALL: [Self; 4] = [
        Self::Stealth,
        Self::CurrentlyEmployed,
        Self::RecentlyQuit,
        Self::BuildingInPublic,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stealth => "stealth",
            Self::CurrentlyEmployed => "currently_employed",
            Self::RecentlyQuit => "recently_quit",
            Self::BuildingInPublic => "building_in_public",
        }
    }

    /// Parse the storage form, tolerating surrounding whitespace, case, and
    /// spaces in place of underscores (`"Building In Public"`).
    #[must_use]
    pub fn parse_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConfidenceLabel
// ---------------------------------------------------------------------------

/// Ordered certainty tag attached to a status decision (`low < medium < high`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    Low,
    Medium,
    High,
}

impl ConfidenceLabel {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Case-insensitive parse of the storage form.
    #[must_use]
    pub fn parse_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|label| label.as_str() == normalized)
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RefreshStatus
// ---------------------------------------------------------------------------

/// Outcome marker of the most recent refresh attempt for a profile.
///
/// Every pipeline path (success or failure) writes one of these together with
/// `last_attempted_refresh_timestamp`, so the next run can find and retry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    NotRefreshed,
    Success,
    PendingReview,
    FetchFailed,
    ClassificationFailed,
    StaleConflict,
    Unrefreshable,
}

impl RefreshStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRefreshed => "not_refreshed",
            Self::Success => "success",
            Self::PendingReview => "pending_review",
            Self::FetchFailed => "fetch_failed",
            Self::ClassificationFailed => "classification_failed",
            Self::StaleConflict => "stale_conflict",
            Self::Unrefreshable => "unrefreshable",
        }
    }

    /// Whether this marker records a failed attempt.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(
            self,
            Self::FetchFailed | Self::ClassificationFailed | Self::StaleConflict | Self::Unrefreshable
        )
    }
}

impl fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProfileKind
// ---------------------------------------------------------------------------

/// Which profile table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Former employees of a tracked company, watched for founder signals.
    StealthFounder,
    /// Current employees of a tracked company, watched for departures.
    CurrentEmployee,
}

impl ProfileKind {
    pub const ALL: [Self; 2] = [Self::StealthFounder, Self::CurrentEmployee];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StealthFounder => "stealth_founder",
            Self::CurrentEmployee => "current_employee",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DecisionSource
// ---------------------------------------------------------------------------

/// Who accepted a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Auto,
    Human,
}

impl DecisionSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Human => "human",
        }
    }
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected:expr) => {
            #[test]
            fn $name() {
                let json = serde_json::to_string(&$variant).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, $variant);
            }
        };
    }

    test_serde_roundtrip!(
        status_building_in_public,
        ProfileStatus,
        ProfileStatus::BuildingInPublic,
        "building_in_public"
    );
    test_serde_roundtrip!(
        status_currently_employed,
        ProfileStatus,
        ProfileStatus::CurrentlyEmployed,
        "currently_employed"
    );
    test_serde_roundtrip!(
        refresh_pending_review,
        RefreshStatus,
        RefreshStatus::PendingReview,
        "pending_review"
    );
    test_serde_roundtrip!(
        kind_stealth_founder,
        ProfileKind,
        ProfileKind::StealthFounder,
        "stealth_founder"
    );
    test_serde_roundtrip!(confidence_medium, ConfidenceLabel, ConfidenceLabel::Medium, "medium");

    #[test]
    fn confidence_is_ordered() {
        assert!(ConfidenceLabel::Low < ConfidenceLabel::Medium);
        assert!(ConfidenceLabel::Medium < ConfidenceLabel::High);
        assert_eq!(
            ConfidenceLabel::ALL.iter().max(),
            Some(&ConfidenceLabel::High)
        );
    }

    #[test]
    fn status_parse_label_is_lenient() {
        assert_eq!(
            ProfileStatus::parse_label(" Building In Public "),
            Some(ProfileStatus::BuildingInPublic)
        );
        assert_eq!(
            ProfileStatus::parse_label("RECENTLY_QUIT"),
            Some(ProfileStatus::RecentlyQuit)
        );
        assert_eq!(ProfileStatus::parse_label("founder"), None);
        assert_eq!(ProfileStatus::parse_label(""), None);
    }

    #[test]
    fn confidence_parse_label() {
        assert_eq!(ConfidenceLabel::parse_label("HIGH"), Some(ConfidenceLabel::High));
        assert_eq!(ConfidenceLabel::parse_label("low\n"), Some(ConfidenceLabel::Low));
        assert_eq!(ConfidenceLabel::parse_label("certain"), None);
    }

    #[test]
    fn failure_markers() {
        assert!(RefreshStatus::FetchFailed.is_failure());
        assert!(RefreshStatus::Unrefreshable.is_failure());
        assert!(!RefreshStatus::Success.is_failure());
        assert!(!RefreshStatus::PendingReview.is_failure());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ProfileStatus::Stealth), "stealth");
        assert_eq!(format!("{}", ConfidenceLabel::High), "high");
        assert_eq!(
            format!("{}", RefreshStatus::ClassificationFailed),
            "classification_failed"
        );
        assert_eq!(format!("{}", ProfileKind::CurrentEmployee), "current_employee");
        assert_eq!(format!("{}", DecisionSource::Human), "human");
    }
}
