//! Count-session repository and workflow.
//!
//! A session is created as a draft with the academic term of its date
//! snapshotted, counted item by item, then completed. Completion binds the
//! session to its stored term and copies every live count into
//! `historical_counts`. Completed sessions can be reopened and counted again;
//! completing twice writes the same rows.

use chrono::{DateTime, Utc};

use av_core::calendar::current_term;
use av_core::entities::{InventorySession, SessionCount};
use av_core::ids::{PREFIX_SESSION, PREFIX_SESSION_COUNT};
use av_core::responses::{SessionProgress, SyncFailure, SyncReport};

use crate::error::DatabaseError;
use crate::helpers::{
    get_bool, get_opt_string, get_year, opt_value, optional_text, parse_datetime, parse_enum,
    require_text,
};
use crate::service::AvService;

const SELECT_COLS: &str = "id, name, academic_term_id, term, term_year, date, is_complete, \
                           conducted_by_uid, notes, created_at";

fn row_to_session(row: &libsql::Row) -> Result<InventorySession, DatabaseError> {
    Ok(InventorySession {
        id: row.get(0)?,
        name: row.get(1)?,
        academic_term_id: get_opt_string(row, 2)?,
        term: parse_enum(&row.get::<String>(3)?)?,
        term_year: get_year(row, 4)?,
        date: parse_datetime(&row.get::<String>(5)?)?,
        is_complete: get_bool(row, 6)?,
        conducted_by_uid: get_opt_string(row, 7)?,
        notes: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl AvService {
    /// Create a draft session dated `date`, snapshotting its academic term.
    pub async fn create_session(
        &self,
        name: &str,
        notes: Option<&str>,
        conducted_by: Option<&str>,
        date: DateTime<Utc>,
    ) -> Result<InventorySession, DatabaseError> {
        let name = require_text("Session name", name)?;
        let term = current_term(date.date_naive());
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SESSION).await?;

        let session = InventorySession {
            id,
            name,
            academic_term_id: None,
            term: term.term,
            term_year: term.year,
            date,
            is_complete: false,
            conducted_by_uid: optional_text(conducted_by),
            notes: optional_text(notes),
            created_at: now,
        };

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO inventory_sessions ({SELECT_COLS})
                     VALUES (?1, ?2, NULL, ?3, ?4, ?5, 0, ?6, ?7, ?8)"
                ),
                libsql::params![
                    session.id.as_str(),
                    session.name.as_str(),
                    session.term.as_str(),
                    i64::from(session.term_year),
                    date.to_rfc3339(),
                    opt_value(session.conducted_by_uid.as_deref()),
                    opt_value(session.notes.as_deref()),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::info!(id = %session.id, term = %term.name, "session created");
        Ok(session)
    }

    pub async fn get_session(&self, id: &str) -> Result<InventorySession, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM inventory_sessions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("Session", id))?;
        row_to_session(&row)
    }

    /// Sessions, most recent date first (ties: newest created first).
    pub async fn list_sessions(&self) -> Result<Vec<InventorySession>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM inventory_sessions"), ())
            .await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        sessions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(sessions)
    }

    /// Upsert the live count of one item in a session.
    ///
    /// On a completed session bound to a term the historical count for that
    /// term is updated as well.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a negative quantity and
    /// `DatabaseError::NotFound` for an unknown session or item.
    pub async fn record_count(
        &self,
        session_id: &str,
        item_id: &str,
        quantity: i64,
        counted_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<SessionCount, DatabaseError> {
        if quantity < 0 {
            return Err(DatabaseError::Validation(format!(
                "Count must be zero or more (got {quantity})"
            )));
        }
        let session = self.get_session(session_id).await?;
        self.get_item(item_id).await?;

        let id = self.db().generate_id(PREFIX_SESSION_COUNT).await?;
        let notes = optional_text(notes);
        self.db()
            .conn()
            .execute(
                "INSERT INTO session_counts
                     (id, item_id, session_id, counted_quantity, counted_by_uid, counted_at, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(item_id, session_id) DO UPDATE SET
                     counted_quantity = excluded.counted_quantity,
                     counted_by_uid = excluded.counted_by_uid,
                     counted_at = excluded.counted_at,
                     notes = excluded.notes",
                libsql::params![
                    id.as_str(),
                    item_id,
                    session_id,
                    quantity,
                    opt_value(counted_by),
                    Utc::now().to_rfc3339(),
                    opt_value(notes.as_deref())
                ],
            )
            .await?;

        let count = self.get_session_count(session_id, item_id).await?;

        if session.is_complete
            && let Some(term_id) = session.academic_term_id.as_deref()
        {
            self.upsert_historical_count(
                item_id,
                term_id,
                quantity,
                Some(session_id),
                counted_by,
                notes.as_deref(),
            )
            .await?;
        }

        tracing::debug!(%session_id, %item_id, quantity, "count recorded");
        Ok(count)
    }

    /// How many existing items have a live count in the session.
    pub async fn session_progress(&self, session_id: &str) -> Result<SessionProgress, DatabaseError> {
        self.get_session(session_id).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(DISTINCT sc.item_id)
                 FROM session_counts sc JOIN items i ON i.id = sc.item_id
                 WHERE sc.session_id = ?1",
                [session_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let counted = u32::try_from(row.get::<i64>(0)?).unwrap_or(u32::MAX);
        let total = self.count_items().await?;
        Ok(SessionProgress::new(session_id, counted, total))
    }

    /// Complete a session and copy its live counts into historical counts.
    ///
    /// The session is marked complete and bound to its term before any count
    /// is copied. Each copy is independent: failures are logged and listed in
    /// the report, and calling this again retries them.
    pub async fn complete_session(&self, session_id: &str) -> Result<SyncReport, DatabaseError> {
        let session = self.get_session(session_id).await?;
        let term = self
            .find_or_create_term(session.term, session.term_year)
            .await?;

        self.db()
            .conn()
            .execute(
                "UPDATE inventory_sessions SET academic_term_id = ?1, is_complete = 1 WHERE id = ?2",
                libsql::params![term.id.as_str(), session_id],
            )
            .await?;

        let mut report = SyncReport {
            session_id: session_id.to_string(),
            academic_term_id: term.id.clone(),
            term_name: term.name.clone(),
            upserted: 0,
            failed: Vec::new(),
        };

        for count in self.list_session_counts(session_id).await? {
            match self
                .upsert_historical_count(
                    &count.item_id,
                    &term.id,
                    count.counted_quantity,
                    Some(session_id),
                    count.counted_by_uid.as_deref(),
                    count.notes.as_deref(),
                )
                .await
            {
                Ok(_) => report.upserted += 1,
                Err(e) => {
                    tracing::warn!(%session_id, item_id = %count.item_id, error = %e, "historical count upsert failed");
                    report.failed.push(SyncFailure {
                        item_id: count.item_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            %session_id,
            term = %term.name,
            upserted = report.upserted,
            failed = report.failed.len(),
            "session completed"
        );
        Ok(report)
    }

    /// Put a completed session back into edit mode. The term binding is kept.
    pub async fn reopen_session(&self, session_id: &str) -> Result<InventorySession, DatabaseError> {
        let session = self.get_session(session_id).await?;
        if !session.is_complete {
            return Err(DatabaseError::InvalidState(format!(
                "Session {session_id} is not complete"
            )));
        }
        self.db()
            .conn()
            .execute(
                "UPDATE inventory_sessions SET is_complete = 0 WHERE id = ?1",
                [session_id],
            )
            .await?;
        Ok(InventorySession {
            is_complete: false,
            ..session
        })
    }

    /// Delete a session, its live counts, and the historical counts it wrote.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), DatabaseError> {
        self.get_session(session_id).await?;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "DELETE FROM historical_counts WHERE session_id = ?1",
            [session_id],
        )
        .await?;
        tx.execute("DELETE FROM session_counts WHERE session_id = ?1", [session_id])
            .await?;
        tx.execute("DELETE FROM inventory_sessions WHERE id = ?1", [session_id])
            .await?;
        tx.commit().await?;
        tracing::info!(%session_id, "session deleted");
        Ok(())
    }
}
