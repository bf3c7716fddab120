//! Parsing of provider date ranges into month-precision dates.
//!
//! The profile provider reports role and education periods as free text:
//! `"Oct 2018 - Present"`, `"2020 - 2022"`, `"Mar 2021"`, or an empty string.
//! Months resolve to the first day of the month; year-only values resolve to
//! January.

use chrono::NaiveDate;

use crate::errors::CoreError;

/// A parsed period. `end == None` means ongoing (or unknown when `start` is
/// also `None`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Parse a provider date range.
///
/// A single value without a separator is a one-month (or one-year) role and
/// yields `end == start`.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] when either side is not a recognizable
/// month or year.
pub fn parse_date_range(raw: &str) -> Result<DateRange, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DateRange::default());
    }

    let Some((start_raw, end_raw)) = split_range(raw) else {
        let month = parse_month(raw)?;
        return Ok(DateRange {
            start: Some(month),
            end: Some(month),
        });
    };

    let start = if start_raw.is_empty() {
        None
    } else {
        Some(parse_month(start_raw)?)
    };
    let end = if end_raw.is_empty() || end_raw.eq_ignore_ascii_case("present") {
        None
    } else {
        Some(parse_month(end_raw)?)
    };

    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(CoreError::Validation(format!(
            "date range ends before it starts: {raw}"
        )));
    }

    Ok(DateRange { start, end })
}

/// Parse `"Oct 2018"`, `"October 2018"`, or `"2018"` into the first day of
/// that month.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] for anything else.
pub fn parse_month(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| CoreError::Validation(format!("year out of range: {raw}")));
    }
    NaiveDate::parse_from_str(&format!("1 {raw}"), "%d %B %Y")
        .map_err(|e| CoreError::Validation(format!("unrecognized month '{raw}': {e}")))
}

fn split_range(raw: &str) -> Option<(&str, &str)> {
    ['\u{2013}', '\u{2014}', '-']
        .into_iter()
        .find_map(|sep| raw.split_once(sep))
        .map(|(start, end)| (start.trim(), end.trim()))
}
