//! Snapshot differ.
//!
//! Compares the work history of a stored snapshot against a freshly fetched
//! one. Pure and infallible: missing lists behave as empty lists.

use std::cmp::Ordering;

use crate::entities::{ChangeDescriptor, ExperienceEntry, ProfileSnapshot, RoleDelta};

/// Compare two snapshots and describe how the work history changed.
///
/// Entries are matched by `(company, title)` after trimming and case-folding,
/// as a multiset. An unmatched stored ongoing entry and an unmatched fresh
/// entry with the same start month are reported as one [`RoleDelta`] instead
/// of a removal plus an addition.
#[must_use]
pub fn diff(stored: &ProfileSnapshot, fresh: &ProfileSnapshot) -> ChangeDescriptor {
    let mut stored_open: Vec<bool> = vec![true; stored.experiences.len()];
    let mut fresh_open: Vec<bool> = vec![true; fresh.experiences.len()];

    for (fi, fresh_entry) in fresh.experiences.iter().enumerate() {
        let identity = fresh_entry.identity();
        let hit = stored
            .experiences
            .iter()
            .enumerate()
            .position(|(si, s)| stored_open[si] && s.identity() == identity);
        if let Some(si) = hit {
            stored_open[si] = false;
            fresh_open[fi] = false;
        }
    }

    let mut deltas = Vec::new();
    for (si, stored_entry) in stored.experiences.iter().enumerate() {
        if !stored_open[si] || !stored_entry.is_ongoing() {
            continue;
        }
        let Some(start) = stored_entry.start else {
            continue;
        };
        let hit = fresh
            .experiences
            .iter()
            .enumerate()
            .position(|(fi, f)| fresh_open[fi] && f.start == Some(start));
        if let Some(fi) = hit {
            stored_open[si] = false;
            fresh_open[fi] = false;
            deltas.push(role_delta(stored_entry, &fresh.experiences[fi]));
        }
    }

    let added = pick_open(&fresh.experiences, &fresh_open);
    let removed = pick_open(&stored.experiences, &stored_open);

    let previous_role = most_recent_role(&stored.experiences).cloned();
    let current_role = most_recent_role(&fresh.experiences).cloned();
    let material_change = !same_role(previous_role.as_ref(), current_role.as_ref());

    ChangeDescriptor {
        added,
        removed,
        deltas,
        previous_role,
        current_role,
        material_change,
    }
}

/// The most recent role in a work history.
///
/// Providers list work history newest first, so an undated open entry at the
/// top of the list is the current role. Otherwise the latest start month
/// wins, ties prefer ongoing entries, undated entries rank below dated ones,
/// and remaining ties go to the earliest list position.
#[must_use]
pub fn most_recent_role(entries: &[ExperienceEntry]) -> Option<&ExperienceEntry> {
    if let Some(first) = entries.first()
        && first.start.is_none()
        && first.is_ongoing()
    {
        return Some(first);
    }
    entries.iter().fold(None, |best, candidate| match best {
        Some(current) if recency(candidate, current) != Ordering::Greater => Some(current),
        _ => Some(candidate),
    })
}

fn recency(a: &ExperienceEntry, b: &ExperienceEntry) -> Ordering {
    let key = |e: &ExperienceEntry| (e.start.is_some(), e.start, e.is_ongoing());
    key(a).cmp(&key(b))
}

fn same_role(a: Option<&ExperienceEntry>, b: Option<&ExperienceEntry>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.identity() == b.identity() && a.start == b.start && a.end == b.end
        }
        _ => false,
    }
}

fn role_delta(previous: &ExperienceEntry, current: &ExperienceEntry) -> RoleDelta {
    let (prev_company, prev_title) = previous.identity();
    let (cur_company, cur_title) = current.identity();
    RoleDelta {
        previous: previous.clone(),
        current: current.clone(),
        company_changed: prev_company != cur_company,
        title_changed: prev_title != cur_title,
    }
}

fn pick_open(entries: &[ExperienceEntry], open: &[bool]) -> Vec<ExperienceEntry> {
    entries
        .iter()
        .zip(open)
        .filter(|(_, open)| **open)
        .map(|(entry, _)| entry.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ym(year: i32, month: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    fn role(
        company: &str,
        title: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ExperienceEntry {
        ExperienceEntry {
            company: company.into(),
            title: title.into(),
            start,
            end,
            company_linkedin_url: None,
        }
    }

    fn snapshot(experiences: Vec<ExperienceEntry>) -> ProfileSnapshot {
        ProfileSnapshot {
            linkedin_url: "https://www.linkedin.com/in/jane-doe/".into(),
            experiences,
            ..ProfileSnapshot::default()
        }
    }

    #[test]
    fn added_founder_role_is_material() {
        let stored = snapshot(vec![role("A", "eng", ym(2020, 1), ym(2022, 1))]);
        let fresh = snapshot(vec![
            role("A", "eng", ym(2020, 1), ym(2022, 1)),
            role("B", "founder", ym(2023, 1), None),
        ]);

        let change = diff(&stored, &fresh);

        assert!(change.material_change);
        assert_eq!(change.added.len(), 1);
        assert_eq!(change.added[0].identity(), ("b".into(), "founder".into()));
        assert!(change.removed.is_empty());
        assert!(change.deltas.is_empty());
        assert_eq!(change.current_role.as_ref().map(|r| r.company.as_str()), Some("B"));
        assert_eq!(change.previous_role.as_ref().map(|r| r.company.as_str()), Some("A"));
    }

    #[test]
    fn identical_snapshots_have_no_change() {
        let entries = vec![
            role("Acme", "CTO", ym(2021, 4), None),
            role("Initech", "Engineer", ym(2017, 2), ym(2021, 3)),
        ];
        let change = diff(&snapshot(entries.clone()), &snapshot(entries));
        assert!(!change.material_change);
        assert!(change.is_empty());
    }

    #[test]
    fn case_and_whitespace_do_not_count_as_change() {
        let stored = snapshot(vec![role("Acme ", "cto", ym(2021, 4), None)]);
        let fresh = snapshot(vec![role("acme", " CTO", ym(2021, 4), None)]);
        let change = diff(&stored, &fresh);
        assert!(!change.material_change);
        assert!(change.is_empty());
    }

    #[test]
    fn retitled_ongoing_role_is_a_delta() {
        let stored = snapshot(vec![role("Acme", "Head of Product", ym(2021, 4), None)]);
        let fresh = snapshot(vec![role("Acme", "Co-Founder", ym(2021, 4), None)]);

        let change = diff(&stored, &fresh);

        assert!(change.added.is_empty());
        assert!(change.removed.is_empty());
        assert_eq!(change.deltas.len(), 1);
        assert!(change.deltas[0].title_changed);
        assert!(!change.deltas[0].company_changed);
        assert!(change.material_change);
    }

    #[test]
    fn ended_role_is_material_without_list_changes() {
        let stored = snapshot(vec![role("Acme", "VP Sales", ym(2019, 6), None)]);
        let fresh = snapshot(vec![role("Acme", "VP Sales", ym(2019, 6), ym(2024, 2))]);

        let change = diff(&stored, &fresh);

        assert!(change.is_empty());
        assert!(change.material_change);
    }

    #[test]
    fn undated_new_role_on_top_is_material() {
        let stored = snapshot(vec![role("Acme", "Engineer", ym(2019, 5), None)]);
        let fresh = snapshot(vec![
            role("Stealth Startup", "Founder", None, None),
            role("Acme", "Engineer", ym(2019, 5), None),
        ]);

        let change = diff(&stored, &fresh);

        assert!(change.material_change);
        assert_eq!(change.added.len(), 1);
        assert_eq!(
            change.current_role.as_ref().map(|r| r.company.as_str()),
            Some("Stealth Startup")
        );
        assert_eq!(
            change.previous_role.as_ref().map(|r| r.company.as_str()),
            Some("Acme")
        );

        // Refetching the same history is still a no-op.
        let again = diff(&fresh, &fresh);
        assert!(!again.material_change);
        assert!(again.is_empty());
    }

    #[test]
    fn duplicates_match_as_multiset() {
        let stored = snapshot(vec![role("Acme", "Advisor", ym(2018, 1), ym(2019, 1))]);
        let fresh = snapshot(vec![
            role("Acme", "Advisor", ym(2020, 1), None),
            role("Acme", "Advisor", ym(2018, 1), ym(2019, 1)),
        ]);

        let change = diff(&stored, &fresh);

        assert_eq!(change.added.len(), 1);
        assert!(change.removed.is_empty());
    }

    #[test]
    fn older_change_is_not_material() {
        let stored = snapshot(vec![
            role("Acme", "CTO", ym(2021, 4), None),
            role("Initech", "Engineer", ym(2017, 2), ym(2021, 3)),
        ]);
        let fresh = snapshot(vec![role("Acme", "CTO", ym(2021, 4), None)]);

        let change = diff(&stored, &fresh);

        assert_eq!(change.removed.len(), 1);
        assert!(!change.material_change);
    }

    #[test]
    fn missing_lists_never_fail() {
        let empty = ProfileSnapshot::default();
        let change = diff(&empty, &empty);
        assert!(!change.material_change);
        assert_eq!(change, ChangeDescriptor::default());

        let fresh = snapshot(vec![role("Acme", "", None, None)]);
        let change = diff(&empty, &fresh);
        assert!(change.material_change);
        assert_eq!(change.added.len(), 1);
    }

    #[rstest]
    #[case::latest_start_wins(
        vec![role("Old", "x", ym(2015, 1), None), role("New", "x", ym(2020, 1), ym(2021, 1))],
        "New"
    )]
    #[case::ongoing_breaks_tie(
        vec![role("Ended", "x", ym(2020, 1), ym(2021, 1)), role("Ongoing", "x", ym(2020, 1), None)],
        "Ongoing"
    )]
    #[case::undated_below_top_ranks_last(
        vec![role("Dated", "x", ym(2001, 1), ym(2002, 1)), role("Undated", "x", None, None)],
        "Dated"
    )]
    #[case::undated_open_entry_on_top_is_current(
        vec![role("Undated", "x", None, None), role("Dated", "x", ym(2019, 5), None)],
        "Undated"
    )]
    #[case::first_position_breaks_remaining_tie(
        vec![role("First", "x", ym(2020, 1), None), role("Second", "x", ym(2020, 1), None)],
        "First"
    )]
    fn most_recent_role_ordering(#[case] entries: Vec<ExperienceEntry>, #[case] expected: &str) {
        assert_eq!(
            most_recent_role(&entries).map(|r| r.company.as_str()),
            Some(expected)
        );
    }
}
