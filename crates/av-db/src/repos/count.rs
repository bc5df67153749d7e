//! Live and historical count storage, plus the legacy count migration.

use chrono::Utc;

use av_core::entities::{HistoricalCount, SessionCount};
use av_core::ids::PREFIX_HISTORICAL_COUNT;
use av_core::resolve::ResolvedCount;
use av_core::responses::{MigrationReport, SyncFailure};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_value, parse_datetime};
use crate::service::AvService;

const SESSION_COUNT_COLS: &str =
    "id, item_id, session_id, counted_quantity, counted_by_uid, counted_at, notes";

const HISTORICAL_COLS: &str = "id, item_id, academic_term_id, counted_quantity, imported_at, \
                               session_id, counted_by_uid, notes";

fn row_to_session_count(row: &libsql::Row) -> Result<SessionCount, DatabaseError> {
    Ok(SessionCount {
        id: row.get(0)?,
        item_id: row.get(1)?,
        session_id: row.get(2)?,
        counted_quantity: row.get(3)?,
        counted_by_uid: get_opt_string(row, 4)?,
        counted_at: parse_datetime(&row.get::<String>(5)?)?,
        notes: get_opt_string(row, 6)?,
    })
}

fn row_to_historical(row: &libsql::Row) -> Result<HistoricalCount, DatabaseError> {
    Ok(HistoricalCount {
        id: row.get(0)?,
        item_id: row.get(1)?,
        academic_term_id: row.get(2)?,
        counted_quantity: row.get(3)?,
        imported_at: parse_datetime(&row.get::<String>(4)?)?,
        session_id: get_opt_string(row, 5)?,
        counted_by_uid: get_opt_string(row, 6)?,
        notes: get_opt_string(row, 7)?,
    })
}

impl AvService {
    pub async fn get_session_count(
        &self,
        session_id: &str,
        item_id: &str,
    ) -> Result<SessionCount, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SESSION_COUNT_COLS} FROM session_counts
                     WHERE session_id = ?1 AND item_id = ?2"
                ),
                [session_id, item_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("Count", format!("{session_id}/{item_id}")))?;
        row_to_session_count(&row)
    }

    /// Live counts of one session, or of every session when `None`.
    pub async fn list_session_counts_filtered(
        &self,
        session_id: Option<&str>,
    ) -> Result<Vec<SessionCount>, DatabaseError> {
        let mut rows = match session_id {
            Some(id) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SESSION_COUNT_COLS} FROM session_counts
                             WHERE session_id = ?1 ORDER BY counted_at"
                        ),
                        [id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(&format!("SELECT {SESSION_COUNT_COLS} FROM session_counts"), ())
                    .await?
            }
        };
        let mut counts = Vec::new();
        while let Some(row) = rows.next().await? {
            counts.push(row_to_session_count(&row)?);
        }
        Ok(counts)
    }

    pub async fn list_session_counts(&self, session_id: &str) -> Result<Vec<SessionCount>, DatabaseError> {
        self.list_session_counts_filtered(Some(session_id)).await
    }

    /// Insert or update the count for `(item_id, academic_term_id)`.
    ///
    /// On conflict the quantity is replaced; session, counter and notes are
    /// only overwritten when given, so a re-import keeps a session's link.
    pub async fn upsert_historical_count(
        &self,
        item_id: &str,
        academic_term_id: &str,
        quantity: i64,
        session_id: Option<&str>,
        counted_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<HistoricalCount, DatabaseError> {
        if quantity < 0 {
            return Err(DatabaseError::Validation(format!(
                "Count must be zero or more (got {quantity})"
            )));
        }
        let id = self.db().generate_id(PREFIX_HISTORICAL_COUNT).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO historical_counts ({HISTORICAL_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(item_id, academic_term_id) DO UPDATE SET
                         counted_quantity = excluded.counted_quantity,
                         imported_at = excluded.imported_at,
                         session_id = COALESCE(excluded.session_id, historical_counts.session_id),
                         counted_by_uid = COALESCE(excluded.counted_by_uid, historical_counts.counted_by_uid),
                         notes = COALESCE(excluded.notes, historical_counts.notes)"
                ),
                libsql::params![
                    id.as_str(),
                    item_id,
                    academic_term_id,
                    quantity,
                    Utc::now().to_rfc3339(),
                    opt_value(session_id),
                    opt_value(counted_by),
                    opt_value(notes)
                ],
            )
            .await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {HISTORICAL_COLS} FROM historical_counts
                     WHERE item_id = ?1 AND academic_term_id = ?2"
                ),
                [item_id, academic_term_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_historical(&row)
    }

    /// Historical counts, optionally for a single item.
    pub async fn list_historical_counts(
        &self,
        item_id: Option<&str>,
    ) -> Result<Vec<HistoricalCount>, DatabaseError> {
        let mut rows = match item_id {
            Some(id) => {
                self.db()
                    .conn()
                    .query(
                        &format!("SELECT {HISTORICAL_COLS} FROM historical_counts WHERE item_id = ?1"),
                        [id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(&format!("SELECT {HISTORICAL_COLS} FROM historical_counts"), ())
                    .await?
            }
        };
        let mut counts = Vec::new();
        while let Some(row) = rows.next().await? {
            counts.push(row_to_historical(&row)?);
        }
        Ok(counts)
    }

    /// Latest and previous quantity of one item.
    pub async fn resolve_item_count(&self, item_id: &str) -> Result<ResolvedCount, DatabaseError> {
        self.get_item(item_id).await?;
        let snapshot = self.load_snapshot().await?;
        Ok(snapshot.view().resolver().resolve(item_id))
    }

    /// Fold the live counts of every completed session into historical counts.
    ///
    /// Completed sessions that were never bound to a term are bound to the
    /// term of their snapshot first. Sessions are replayed oldest first so the
    /// newest session in a term wins. Safe to run repeatedly.
    pub async fn migrate_legacy_counts(&self) -> Result<MigrationReport, DatabaseError> {
        let mut report = MigrationReport::default();

        for session in self.list_sessions().await?.into_iter().rev().filter(|s| s.is_complete) {
            let term_id = match session.academic_term_id.clone() {
                Some(id) => id,
                None => {
                    let term = self
                        .find_or_create_term(session.term, session.term_year)
                        .await?;
                    self.db()
                        .conn()
                        .execute(
                            "UPDATE inventory_sessions SET academic_term_id = ?1 WHERE id = ?2",
                            [term.id.as_str(), session.id.as_str()],
                        )
                        .await?;
                    term.id
                }
            };

            report.sessions += 1;
            for count in self.list_session_counts(&session.id).await? {
                match self
                    .upsert_historical_count(
                        &count.item_id,
                        &term_id,
                        count.counted_quantity,
                        Some(&session.id),
                        count.counted_by_uid.as_deref(),
                        count.notes.as_deref(),
                    )
                    .await
                {
                    Ok(_) => report.counts += 1,
                    Err(e) => {
                        tracing::warn!(session_id = %session.id, item_id = %count.item_id, error = %e, "legacy count migration failed");
                        report.failed.push(SyncFailure {
                            item_id: count.item_id,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(sessions = report.sessions, counts = report.counts, "legacy counts migrated");
        Ok(report)
    }
}
