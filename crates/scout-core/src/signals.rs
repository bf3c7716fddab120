//! Profile signals derived from a snapshot's work history.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::entities::{ExperienceEntry, ProfileSnapshot, normalize};

const FOUNDER_KEYWORDS: [&str; 5] = [
    "founder",
    "co-founder",
    "co founder",
    "chief executive officer",
    "ceo",
];

/// Whether a title reads as a founder-type role.
#[must_use]
pub fn is_founder_title(title: &str) -> bool {
    let title = title.to_lowercase();
    FOUNDER_KEYWORDS.iter().any(|keyword| title.contains(keyword))
}

/// More than one founder-type role in the work history.
#[must_use]
pub fn is_repeat_founder(snapshot: &ProfileSnapshot) -> bool {
    snapshot
        .experiences
        .iter()
        .filter(|entry| is_founder_title(&entry.title))
        .count()
        > 1
}

/// Single-word title tokens that mark a leadership role.
const LEADERSHIP_WORDS: [&str; 13] = [
    "director", "head", "avp", "vp", "svp", "evp", "president", "chief", "cto", "ceo", "coo",
    "cfo", "founder",
];

const LEADERSHIP_PHRASES: [&str; 2] = ["senior manager", "general manager"];

/// Months of experience counted, looking back from today.
const SENIORITY_WINDOW_MONTHS: i64 = 15 * 12;
const SENIOR_EXPERIENCE_MONTHS: i64 = 10 * 12;
/// Average dated-role length below this reads as job hopping.
const SUSTAINED_TENURE_MONTHS: i64 = 18;

/// Whether a title reads as a leadership role (Director, Head, VP, C-level,
/// Senior Manager, Founder).
#[must_use]
pub fn is_leadership_title(title: &str) -> bool {
    let title = title.to_lowercase();
    title
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| LEADERSHIP_WORDS.contains(&word))
        || LEADERSHIP_PHRASES.iter().any(|phrase| title.contains(phrase))
}

/// Senior operator: ten or more years of experience within the last fifteen,
/// at least one leadership title, and sustained tenure per role.
///
/// Overlapping roles count once. Ongoing roles run until `today`; undated
/// roles contribute nothing but their title.
#[must_use]
pub fn is_senior_operator(snapshot: &ProfileSnapshot, today: NaiveDate) -> bool {
    let now = month_index(today);
    let mut spans: Vec<(i64, i64)> = snapshot
        .experiences
        .iter()
        .filter_map(|entry| {
            let start = month_index(entry.start?);
            let end = entry.end.map_or(now, month_index).min(now);
            (end >= start).then_some((start, end))
        })
        .collect();
    if spans.is_empty() {
        return false;
    }

    let roles = i64::try_from(spans.len()).unwrap_or(i64::MAX);
    let tenure = spans.iter().map(|(s, e)| e - s + 1).sum::<i64>() / roles;
    let leadership = snapshot
        .experiences
        .iter()
        .any(|entry| is_leadership_title(&entry.title));

    let window_start = now - SENIORITY_WINDOW_MONTHS + 1;
    spans.sort_unstable();
    let mut experience = 0;
    let mut covered_until = window_start - 1;
    for (start, end) in spans {
        let start = start.max(covered_until + 1);
        if end >= start {
            experience += end - start + 1;
            covered_until = end;
        }
    }

    experience >= SENIOR_EXPERIENCE_MONTHS && leadership && tenure >= SUSTAINED_TENURE_MONTHS
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Reference companies for classification: the profile's tracked company
/// plus configured extras, trimmed, with blanks and duplicates (ignoring
/// case) dropped.
#[must_use]
pub fn reference_companies(tracked_company: &str, extra: &[String]) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut companies = BTreeSet::new();
    for company in std::iter::once(tracked_company).chain(extra.iter().map(String::as_str)) {
        let trimmed = company.trim();
        if !trimmed.is_empty() && seen.insert(normalize(trimmed)) {
            companies.insert(trimmed.to_string());
        }
    }
    companies
}

/// Whether a role is at one of the reference companies (case-insensitive).
#[must_use]
pub fn is_at_reference_company(entry: &ExperienceEntry, references: &BTreeSet<String>) -> bool {
    let company = normalize(&entry.company);
    !company.is_empty() && references.iter().any(|r| normalize(r) == company)
}
