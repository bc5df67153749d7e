//! Academic term repository. Terms are keyed by the natural `(term, year)` pair.

use chrono::{NaiveDate, Utc};

use av_core::entities::{AcademicTerm, TermKey};
use av_core::enums::TermType;
use av_core::ids::PREFIX_TERM;
use av_core::resolve::terms_newest_first;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_year, parse_datetime, parse_enum, parse_optional_date};
use crate::service::AvService;

const SELECT_COLS: &str = "id, name, term, year, start_date, end_date, created_at";

fn row_to_term(row: &libsql::Row) -> Result<AcademicTerm, DatabaseError> {
    Ok(AcademicTerm {
        id: row.get(0)?,
        name: row.get(1)?,
        term: parse_enum(&row.get::<String>(2)?)?,
        year: get_year(row, 3)?,
        start_date: parse_optional_date(get_opt_string(row, 4)?.as_deref())?,
        end_date: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn date_value(date: Option<NaiveDate>) -> libsql::Value {
    date.map_or(libsql::Value::Null, |d| d.format("%Y-%m-%d").to_string().into())
}

impl AvService {
    pub async fn find_term(&self, term: TermType, year: i32) -> Result<Option<AcademicTerm>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM academic_terms WHERE term = ?1 AND year = ?2"),
                libsql::params![term.as_str(), i64::from(year)],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_term(&row)?)),
            None => Ok(None),
        }
    }

    /// Return the stored term for `(term, year)`, creating it on first use.
    pub async fn find_or_create_term(&self, term: TermType, year: i32) -> Result<AcademicTerm, DatabaseError> {
        if let Some(existing) = self.find_term(term, year).await? {
            return Ok(existing);
        }

        let id = self.db().generate_id(PREFIX_TERM).await?;
        let name = TermKey::new(term, year).display_name();
        self.db()
            .conn()
            .execute(
                "INSERT INTO academic_terms (id, name, term, year, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(term, year) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    name.as_str(),
                    term.as_str(),
                    i64::from(year),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(%name, "academic term created");

        self.find_term(term, year).await?.ok_or(DatabaseError::NoResult)
    }

    /// Find-or-create a term and set its date range when given.
    pub async fn ensure_term(
        &self,
        term: TermType,
        year: i32,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<AcademicTerm, DatabaseError> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(DatabaseError::Validation(
                "Term end date is before its start date".into(),
            ));
        }

        let stored = self.find_or_create_term(term, year).await?;
        if start_date.is_none() && end_date.is_none() {
            return Ok(stored);
        }

        self.db()
            .conn()
            .execute(
                "UPDATE academic_terms
                 SET start_date = COALESCE(?1, start_date), end_date = COALESCE(?2, end_date)
                 WHERE id = ?3",
                libsql::params![date_value(start_date), date_value(end_date), stored.id.as_str()],
            )
            .await?;
        self.get_term(&stored.id).await
    }

    pub async fn get_term(&self, id: &str) -> Result<AcademicTerm, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM academic_terms WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("Academic term", id))?;
        row_to_term(&row)
    }

    /// All terms, most recent first.
    pub async fn list_terms(&self) -> Result<Vec<AcademicTerm>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM academic_terms"), ())
            .await?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next().await? {
            terms.push(row_to_term(&row)?);
        }
        Ok(terms_newest_first(&terms).into_iter().cloned().collect())
    }
}
