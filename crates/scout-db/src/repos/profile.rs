//! Profile repository: ingestion insert, lookups, due selection, and refresh
//! bookkeeping.
//!
//! Every bookkeeping write stamps `last_attempted_refresh_timestamp` along
//! with the new `refresh_status`, so the next batch can find the profile.

use chrono::{DateTime, Utc};
use libsql::Value;

use scout_core::entities::{NewProfile, PendingReview, ProfileRecord, ProfileRef, ProfileSnapshot};
use scout_core::enums::{ConfidenceLabel, ProfileKind, RefreshStatus};
use scout_core::signals::{is_repeat_founder, is_senior_operator};

use crate::error::DatabaseError;
use crate::helpers::{
    format_timestamp, get_opt_string, parse_datetime, parse_enum, parse_json,
    parse_optional_datetime, parse_optional_enum, parse_optional_json, profile_table, to_json,
};
use crate::service::ScoutService;

pub(crate) const PROFILE_COLUMNS: &str = "id, linkedin_url, tracked_company, full_name, headline, \
     location, follower_count, connection_count, experiences, educations, profile_status, \
     refresh_status, status_confidence_label, last_attempted_refresh_timestamp, \
     is_senior_operator, is_repeat_founder, pending_candidate_status, pending_confidence, \
     pending_change, pending_proposed_at, created_at";

fn row_to_profile(row: &libsql::Row, kind: ProfileKind) -> Result<ProfileRecord, DatabaseError> {
    let linkedin_url = row.get::<String>(1)?;
    let pending_review = match parse_optional_enum(get_opt_string(row, 16)?.as_deref())? {
        Some(candidate_status) => Some(PendingReview {
            candidate_status,
            confidence: parse_enum(&row.get::<String>(17)?)?,
            change: parse_optional_json(get_opt_string(row, 18)?.as_deref())?.unwrap_or_default(),
            proposed_at: parse_datetime(&row.get::<String>(19)?)?,
        }),
        None => None,
    };

    Ok(ProfileRecord {
        id: row.get::<i64>(0)?,
        kind,
        snapshot: ProfileSnapshot {
            linkedin_url: linkedin_url.clone(),
            full_name: get_opt_string(row, 3)?,
            headline: get_opt_string(row, 4)?,
            location: get_opt_string(row, 5)?,
            follower_count: row.get::<Option<i64>>(6)?,
            connection_count: row.get::<Option<i64>>(7)?,
            experiences: parse_json(&row.get::<String>(8)?)?,
            educations: parse_json(&row.get::<String>(9)?)?,
        },
        linkedin_url,
        tracked_company: row.get::<String>(2)?,
        profile_status: parse_enum(&row.get::<String>(10)?)?,
        refresh_status: parse_enum(&row.get::<String>(11)?)?,
        status_confidence_label: parse_optional_enum(get_opt_string(row, 12)?.as_deref())?,
        last_attempted_refresh_timestamp: parse_optional_datetime(
            get_opt_string(row, 13)?.as_deref(),
        )?,
        is_senior_operator: row.get::<i64>(14)? != 0,
        is_repeat_founder: row.get::<i64>(15)? != 0,
        pending_review,
        created_at: parse_datetime(&row.get::<String>(20)?)?,
    })
}

pub(crate) fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

fn opt_integer(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

/// `SET` fragment replacing the flattened snapshot columns, numbered from
/// `first_idx`. Recomputes `is_repeat_founder` from the new work history and
/// raises `is_senior_operator` when the history now qualifies. Seniority is
/// never cleared by a refresh.
pub(crate) fn snapshot_assignments(
    snapshot: &ProfileSnapshot,
    first_idx: usize,
) -> Result<(String, Vec<Value>), DatabaseError> {
    let columns = [
        "full_name",
        "headline",
        "location",
        "follower_count",
        "connection_count",
        "experiences",
        "educations",
        "is_repeat_founder",
    ];
    let params = vec![
        opt_text(snapshot.full_name.as_deref()),
        opt_text(snapshot.headline.as_deref()),
        opt_text(snapshot.location.as_deref()),
        opt_integer(snapshot.follower_count),
        opt_integer(snapshot.connection_count),
        Value::Text(to_json(&snapshot.experiences)?),
        Value::Text(to_json(&snapshot.educations)?),
        Value::Integer(i64::from(is_repeat_founder(snapshot))),
        Value::Integer(i64::from(is_senior_operator(snapshot, Utc::now().date_naive()))),
    ];
    let mut assignments = columns
        .iter()
        .enumerate()
        .map(|(offset, column)| format!("{column} = ?{}", first_idx + offset))
        .collect::<Vec<_>>();
    assignments.push(format!(
        "is_senior_operator = MAX(is_senior_operator, ?{})",
        first_idx + columns.len()
    ));
    Ok((assignments.join(", "), params))
}

/// Filter for [`ScoutService::list_due_profiles`].
#[derive(Debug, Clone, Default)]
pub struct DueFilter {
    pub kind: Option<ProfileKind>,
    /// Case-insensitive match on the tracked company.
    pub company: Option<String>,
    /// Only profiles last attempted before this instant, or never attempted.
    /// `None` ignores staleness.
    pub stale_before: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl ScoutService {
    /// Insert a brand-new profile (initial ingestion).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a profile without a LinkedIn
    /// URL, or a libSQL error (e.g. the `(linkedin_url, tracked_company)` pair
    /// already exists).
    pub async fn insert_profile(&self, profile: &NewProfile) -> Result<ProfileRecord, DatabaseError> {
        let snapshot = &profile.snapshot;
        if snapshot.linkedin_url.trim().is_empty() {
            return Err(DatabaseError::InvalidState(
                "profile has no linkedin url".to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO {} (linkedin_url, tracked_company, full_name, headline, location,
                 follower_count, connection_count, experiences, educations, profile_status,
                 refresh_status, status_confidence_label, is_senior_operator, is_repeat_founder,
                 created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            profile_table(profile.kind)
        );
        let params = vec![
            text(snapshot.linkedin_url.trim()),
            text(profile.tracked_company.trim()),
            opt_text(snapshot.full_name.as_deref()),
            opt_text(snapshot.headline.as_deref()),
            opt_text(snapshot.location.as_deref()),
            opt_integer(snapshot.follower_count),
            opt_integer(snapshot.connection_count),
            Value::Text(to_json(&snapshot.experiences)?),
            Value::Text(to_json(&snapshot.educations)?),
            text(profile.profile_status.as_str()),
            text(RefreshStatus::NotRefreshed.as_str()),
            opt_text(profile.status_confidence_label.map(ConfidenceLabel::as_str)),
            Value::Integer(i64::from(
                profile.is_senior_operator || is_senior_operator(snapshot, Utc::now().date_naive()),
            )),
            Value::Integer(i64::from(is_repeat_founder(snapshot))),
            text(&format_timestamp(Utc::now())),
        ];

        let id = {
            let _guard = self.db().lock_writes().await;
            self.db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?;
            self.db().conn().last_insert_rowid()
        };

        let profile_ref = ProfileRef::new(profile.kind, id);
        tracing::info!(profile = %profile_ref, status = %profile.profile_status, "inserted profile");
        self.get_profile(profile_ref).await
    }

    /// Fetch one profile.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the row does not exist.
    pub async fn get_profile(&self, profile: ProfileRef) -> Result<ProfileRecord, DatabaseError> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM {} WHERE id = ?1",
            profile_table(profile.kind)
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![profile.id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NotFound { profile })?;
        row_to_profile(&row, profile.kind)
    }

    pub(crate) async fn profile_exists(&self, profile: ProfileRef) -> Result<bool, DatabaseError> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", profile_table(profile.kind));
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![profile.id])
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Profiles due for a refresh, oldest attempt first (never-attempted
    /// profiles lead). Unrefreshable profiles are never due.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row cannot be parsed.
    pub async fn list_due_profiles(
        &self,
        filter: &DueFilter,
    ) -> Result<Vec<ProfileRecord>, DatabaseError> {
        let kinds = filter.kind.map_or_else(|| ProfileKind::ALL.to_vec(), |k| vec![k]);
        let mut due = Vec::new();

        for kind in kinds {
            let mut conditions = vec![format!(
                "refresh_status <> '{}'",
                RefreshStatus::Unrefreshable.as_str()
            )];
            let mut params: Vec<Value> = Vec::new();
            if let Some(before) = filter.stale_before {
                params.push(text(&format_timestamp(before)));
                conditions.push(format!(
                    "(last_attempted_refresh_timestamp IS NULL OR last_attempted_refresh_timestamp < ?{})",
                    params.len()
                ));
            }
            if let Some(company) = &filter.company {
                params.push(text(company.trim()));
                conditions.push(format!("lower(tracked_company) = lower(?{})", params.len()));
            }
            let mut sql = format!(
                "SELECT {PROFILE_COLUMNS} FROM {} WHERE {}
                 ORDER BY last_attempted_refresh_timestamp IS NOT NULL,
                          last_attempted_refresh_timestamp, id",
                profile_table(kind),
                conditions.join(" AND ")
            );
            if let Some(limit) = filter.limit {
                params.push(Value::Integer(i64::from(limit)));
                sql = format!("{sql} LIMIT ?{}", params.len());
            }

            let mut rows = self
                .db()
                .conn()
                .query(&sql, libsql::params_from_iter(params))
                .await?;
            while let Some(row) = rows.next().await? {
                due.push(row_to_profile(&row, kind)?);
            }
        }

        due.sort_by_key(|p| {
            (
                p.last_attempted_refresh_timestamp.is_some(),
                p.last_attempted_refresh_timestamp,
                p.kind.as_str(),
                p.id,
            )
        });
        if let Some(limit) = filter.limit {
            due.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(due)
    }

    /// Profiles with an outstanding human review, oldest proposal first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row cannot be parsed.
    pub async fn list_pending_reviews(
        &self,
        kind: Option<ProfileKind>,
    ) -> Result<Vec<ProfileRecord>, DatabaseError> {
        let kinds = kind.map_or_else(|| ProfileKind::ALL.to_vec(), |k| vec![k]);
        let mut pending = Vec::new();
        for kind in kinds {
            let sql = format!(
                "SELECT {PROFILE_COLUMNS} FROM {} WHERE pending_candidate_status IS NOT NULL
                 ORDER BY pending_proposed_at, id",
                profile_table(kind)
            );
            let mut rows = self.db().conn().query(&sql, ()).await?;
            while let Some(row) = rows.next().await? {
                pending.push(row_to_profile(&row, kind)?);
            }
        }
        pending.sort_by_key(|p| (p.pending_review.as_ref().map(|r| r.proposed_at), p.id));
        Ok(pending)
    }

    /// Replace the stored snapshot after an attempt that changed no status.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the row does not exist.
    pub async fn store_snapshot(
        &self,
        profile: ProfileRef,
        snapshot: &ProfileSnapshot,
        refresh_status: RefreshStatus,
    ) -> Result<(), DatabaseError> {
        let (snapshot_sql, mut params) = snapshot_assignments(snapshot, 1)?;
        params.push(text(refresh_status.as_str()));
        params.push(text(&format_timestamp(Utc::now())));
        let assignments = format!(
            "{snapshot_sql}, refresh_status = ?{}, last_attempted_refresh_timestamp = ?{}",
            params.len() - 1,
            params.len()
        );
        self.update_profile_row(profile, &assignments, params).await
    }

    /// Park a classifier proposal for human review and store the snapshot it
    /// was made from.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the row does not exist.
    pub async fn flag_pending_review(
        &self,
        profile: ProfileRef,
        snapshot: &ProfileSnapshot,
        review: &PendingReview,
    ) -> Result<(), DatabaseError> {
        let (snapshot_sql, mut params) = snapshot_assignments(snapshot, 1)?;
        let first = params.len() + 1;
        params.extend([
            text(review.candidate_status.as_str()),
            text(review.confidence.as_str()),
            Value::Text(to_json(&review.change)?),
            text(&format_timestamp(review.proposed_at)),
            text(RefreshStatus::PendingReview.as_str()),
            text(&format_timestamp(Utc::now())),
        ]);
        let assignments = format!(
            "{snapshot_sql}, pending_candidate_status = ?{}, pending_confidence = ?{},
             pending_change = ?{}, pending_proposed_at = ?{}, refresh_status = ?{},
             last_attempted_refresh_timestamp = ?{}",
            first,
            first + 1,
            first + 2,
            first + 3,
            first + 4,
            first + 5
        );
        self.update_profile_row(profile, &assignments, params).await
    }

    /// Drop an outstanding review proposal (human rejection).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the row does not exist.
    pub async fn clear_pending_review(
        &self,
        profile: ProfileRef,
        refresh_status: RefreshStatus,
    ) -> Result<(), DatabaseError> {
        self.update_profile_row(
            profile,
            "pending_candidate_status = NULL, pending_confidence = NULL, pending_change = NULL,
             pending_proposed_at = NULL, refresh_status = ?1, last_attempted_refresh_timestamp = ?2",
            vec![
                text(refresh_status.as_str()),
                text(&format_timestamp(Utc::now())),
            ],
        )
        .await
    }

    /// Record the outcome of an attempt that wrote nothing else (failures).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the row does not exist.
    pub async fn mark_refresh_attempt(
        &self,
        profile: ProfileRef,
        refresh_status: RefreshStatus,
    ) -> Result<(), DatabaseError> {
        self.update_profile_row(
            profile,
            "refresh_status = ?1, last_attempted_refresh_timestamp = ?2",
            vec![
                text(refresh_status.as_str()),
                text(&format_timestamp(Utc::now())),
            ],
        )
        .await
    }

    async fn update_profile_row(
        &self,
        profile: ProfileRef,
        assignments: &str,
        mut params: Vec<Value>,
    ) -> Result<(), DatabaseError> {
        params.push(Value::Integer(profile.id));
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{}",
            profile_table(profile.kind),
            params.len()
        );
        let updated = {
            let _guard = self.db().lock_writes().await;
            self.db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?
        };
        if updated == 0 {
            return Err(DatabaseError::NotFound { profile });
        }
        Ok(())
    }
}
