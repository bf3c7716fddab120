use serde::de::DeserializeOwned;

use scout_core::entities::ProfileRef;
use scout_core::enums::ProfileKind;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_optional_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

pub fn profile_ref(kind: &str, id: i64) -> anyhow::Result<ProfileRef> {
    Ok(ProfileRef::new(parse_enum::<ProfileKind>(kind, "kind")?, id))
}

#[cfg(test)]
mod tests {
    use scout_core::enums::{ProfileKind, ProfileStatus};

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let status: ProfileStatus = parse_enum("recently_quit", "status").expect("status should parse");
        assert_eq!(status, ProfileStatus::RecentlyQuit);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let kind: ProfileKind = parse_enum("current-employee", "kind").expect("kind should parse");
        assert_eq!(kind, ProfileKind::CurrentEmployee);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<ProfileKind>("founder", "kind").expect_err("should fail");
        assert!(err.to_string().contains("invalid kind 'founder'"));
    }

    #[test]
    fn optional_enum_passes_none_through() {
        let parsed: Option<ProfileKind> = parse_optional_enum(None, "kind").unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn builds_profile_ref() {
        let profile = profile_ref("stealth_founder", 5).unwrap();
        assert_eq!(profile.to_string(), "stealth_founder#5");
    }
}
