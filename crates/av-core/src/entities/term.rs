use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TermType;

/// A stored academic term. `(term, year)` is the natural key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AcademicTerm {
    pub id: String,
    /// Display name, e.g. `"SPRING 2024"`.
    pub name: String,
    pub term: TermType,
    pub year: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl AcademicTerm {
    #[must_use]
    pub const fn key(&self) -> TermKey {
        TermKey {
            year: self.year,
            term: self.term,
        }
    }
}

/// Orderable `(year, term)` pair.
///
/// Field order matters: the derived `Ord` compares year first, then the fixed
/// SPRING < SUMMER < FALL < WINTER precedence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct TermKey {
    pub year: i32,
    pub term: TermType,
}

impl TermKey {
    #[must_use]
    pub const fn new(term: TermType, year: i32) -> Self {
        Self { year, term }
    }

    /// Default display name, `"{TERM} {year}"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.term, self.year)
    }
}
