//! Transition recorder and status history queries.
//!
//! `record_transition` is the only writer of `status_updates`. It updates the
//! profile with a compare-and-swap on `profile_status` and appends the history
//! row in the same transaction, so every profile's history is one linear
//! chain.

use chrono::{DateTime, Utc};
use libsql::Value;

use scout_core::entities::{ExperienceEntry, NewTransition, ProfileRef, StatusTransition};
use scout_core::enums::{ProfileKind, ProfileStatus, RefreshStatus};

use crate::error::DatabaseError;
use crate::helpers::{
    format_timestamp, get_opt_string, owner_column, parse_datetime, parse_enum, parse_json,
    parse_optional_json, profile_table, to_json,
};
use crate::repos::profile::{opt_text, snapshot_assignments, text};
use crate::service::ScoutService;

const TRANSITION_COLUMNS: &str = "id, created_at, profile_kind, stealth_founder_profile_id, \
     current_employee_profile_id, linkedin_url, old_status, new_status, confidence, \
     experience_change, previous_role_snapshot, current_role_snapshot, decision_source";

fn row_to_transition(row: &libsql::Row) -> Result<StatusTransition, DatabaseError> {
    let kind: ProfileKind = parse_enum(&row.get::<String>(2)?)?;
    let owner_idx = match kind {
        ProfileKind::StealthFounder => 3,
        ProfileKind::CurrentEmployee => 4,
    };
    Ok(StatusTransition {
        id: row.get::<i64>(0)?,
        created_at: parse_datetime(&row.get::<String>(1)?)?,
        profile: ProfileRef::new(kind, row.get::<i64>(owner_idx)?),
        linkedin_url: row.get::<String>(5)?,
        old_status: parse_enum(&row.get::<String>(6)?)?,
        new_status: parse_enum(&row.get::<String>(7)?)?,
        confidence: parse_enum(&row.get::<String>(8)?)?,
        change: parse_json(&row.get::<String>(9)?)?,
        previous_role: parse_optional_json(get_opt_string(row, 10)?.as_deref())?,
        current_role: parse_optional_json(get_opt_string(row, 11)?.as_deref())?,
        source: parse_enum(&row.get::<String>(12)?)?,
    })
}

fn role_json(role: Option<&ExperienceEntry>) -> Result<Option<String>, DatabaseError> {
    role.map(to_json).transpose()
}

/// Filter for [`ScoutService::list_recent_transitions`].
#[derive(Debug, Clone, Default)]
pub struct RecentFilter {
    /// Only transitions at or after this instant.
    pub since: Option<DateTime<Utc>>,
    pub kind: Option<ProfileKind>,
    /// Include transitions into `currently_employed` (excluded otherwise).
    pub include_currently_employed: bool,
    pub limit: Option<u32>,
}

impl ScoutService {
    /// Record an accepted status change.
    ///
    /// In one transaction: update the profile (status, confidence,
    /// `refresh_status = success`, attempt timestamp, cleared review
    /// proposal, and the new snapshot when given) only if its status still
    /// equals `old_status`, then append the history row.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::InvalidState` when `old_status == new_status`.
    /// - `DatabaseError::StaleTransition` when the profile's status is no
    ///   longer `old_status`. Nothing is written.
    /// - `DatabaseError::NotFound` when the profile does not exist.
    pub async fn record_transition(
        &self,
        transition: &NewTransition,
    ) -> Result<StatusTransition, DatabaseError> {
        let profile = transition.profile;
        if transition.old_status == transition.new_status {
            return Err(DatabaseError::InvalidState(format!(
                "transition for {profile} does not change status ({})",
                transition.old_status
            )));
        }

        let stamp = format_timestamp(Utc::now());
        let created_at = parse_datetime(&stamp)?;
        let change_json = to_json(&transition.change)?;
        let previous_role_json = role_json(transition.change.previous_role.as_ref())?;
        let current_role_json = role_json(transition.change.current_role.as_ref())?;

        let mut assignments = String::from(
            "profile_status = ?1, status_confidence_label = ?2, refresh_status = ?3,
             last_attempted_refresh_timestamp = ?4, pending_candidate_status = NULL,
             pending_confidence = NULL, pending_change = NULL, pending_proposed_at = NULL",
        );
        let mut update_params = vec![
            text(transition.new_status.as_str()),
            text(transition.confidence.as_str()),
            text(RefreshStatus::Success.as_str()),
            text(&stamp),
        ];
        if let Some(snapshot) = &transition.snapshot {
            let (snapshot_sql, snapshot_params) =
                snapshot_assignments(snapshot, update_params.len() + 1)?;
            assignments = format!("{assignments}, {snapshot_sql}");
            update_params.extend(snapshot_params);
        }
        update_params.push(Value::Integer(profile.id));
        update_params.push(text(transition.old_status.as_str()));
        let update_sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{} AND profile_status = ?{}",
            profile_table(profile.kind),
            update_params.len() - 1,
            update_params.len()
        );

        let insert_sql = format!(
            "INSERT INTO status_updates (created_at, profile_kind, {}, linkedin_url, old_status,
                 new_status, confidence, experience_change, previous_role_snapshot,
                 current_role_snapshot, decision_source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            owner_column(profile.kind)
        );

        let guard = self.db().lock_writes().await;
        let tx = self.db().conn().transaction().await?;

        let written: Result<Option<(i64, String)>, DatabaseError> = async {
            let updated = tx
                .execute(&update_sql, libsql::params_from_iter(update_params))
                .await?;
            if updated == 0 {
                return Ok(None);
            }

            let linkedin_url = {
                let mut rows = tx
                    .query(
                        &format!(
                            "SELECT linkedin_url FROM {} WHERE id = ?1",
                            profile_table(profile.kind)
                        ),
                        libsql::params![profile.id],
                    )
                    .await?;
                let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
                row.get::<String>(0)?
            };

            tx.execute(
                &insert_sql,
                libsql::params_from_iter(vec![
                    text(&stamp),
                    text(profile.kind.as_str()),
                    Value::Integer(profile.id),
                    text(&linkedin_url),
                    text(transition.old_status.as_str()),
                    text(transition.new_status.as_str()),
                    text(transition.confidence.as_str()),
                    Value::Text(change_json.clone()),
                    opt_text(previous_role_json.as_deref()),
                    opt_text(current_role_json.as_deref()),
                    text(transition.source.as_str()),
                ]),
            )
            .await?;
            Ok(Some((tx.last_insert_rowid(), linkedin_url)))
        }
        .await;

        match written {
            Ok(Some((id, linkedin_url))) => {
                tx.commit().await?;
                drop(guard);
                tracing::info!(
                    profile = %profile,
                    old = %transition.old_status,
                    new = %transition.new_status,
                    confidence = %transition.confidence,
                    source = %transition.source,
                    "recorded status transition"
                );
                Ok(StatusTransition {
                    id,
                    created_at,
                    profile,
                    linkedin_url,
                    old_status: transition.old_status,
                    new_status: transition.new_status,
                    confidence: transition.confidence,
                    change: transition.change.clone(),
                    previous_role: transition.change.previous_role.clone(),
                    current_role: transition.change.current_role.clone(),
                    source: transition.source,
                })
            }
            Ok(None) => {
                tx.rollback().await?;
                drop(guard);
                if self.profile_exists(profile).await? {
                    tracing::warn!(
                        profile = %profile,
                        expected = %transition.old_status,
                        "stale transition rejected"
                    );
                    Err(DatabaseError::StaleTransition {
                        profile,
                        expected: transition.old_status,
                    })
                } else {
                    Err(DatabaseError::NotFound { profile })
                }
            }
            Err(error) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(%rollback, "rollback after failed transition write");
                }
                Err(error)
            }
        }
    }

    /// Full history of one profile, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be parsed.
    pub async fn list_transitions(
        &self,
        profile: ProfileRef,
    ) -> Result<Vec<StatusTransition>, DatabaseError> {
        let sql = format!(
            "SELECT {TRANSITION_COLUMNS} FROM status_updates
             WHERE profile_kind = ?1 AND {} = ?2
             ORDER BY id",
            owner_column(profile.kind)
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![profile.kind.as_str(), profile.id])
            .await?;
        let mut transitions = Vec::new();
        while let Some(row) = rows.next().await? {
            transitions.push(row_to_transition(&row)?);
        }
        Ok(transitions)
    }

    /// Recent transitions across all profiles, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be parsed.
    pub async fn list_recent_transitions(
        &self,
        filter: &RecentFilter,
    ) -> Result<Vec<StatusTransition>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(since) = filter.since {
            params.push(text(&format_timestamp(since)));
            conditions.push(format!("created_at >= ?{}", params.len()));
        }
        if let Some(kind) = filter.kind {
            params.push(text(kind.as_str()));
            conditions.push(format!("profile_kind = ?{}", params.len()));
        }
        if !filter.include_currently_employed {
            params.push(text(ProfileStatus::CurrentlyEmployed.as_str()));
            conditions.push(format!("new_status <> ?{}", params.len()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let mut sql = format!(
            "SELECT {TRANSITION_COLUMNS} FROM status_updates {where_clause}
             ORDER BY created_at DESC, id DESC"
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
        let mut transitions = Vec::new();
        while let Some(row) = rows.next().await? {
            transitions.push(row_to_transition(&row)?);
        }
        Ok(transitions)
    }
}
