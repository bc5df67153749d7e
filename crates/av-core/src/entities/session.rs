use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::TermKey;
use crate::enums::TermType;

/// A count session.
///
/// ```text
/// draft (is_complete = false) → complete (is_complete = true)
///                              ← reopen (edit counts)
/// ```
///
/// `term`/`term_year` are snapshotted from the calendar at creation;
/// `academic_term_id` is bound when the session is completed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySession {
    pub id: String,
    pub name: String,
    pub academic_term_id: Option<String>,
    pub term: TermType,
    pub term_year: i32,
    pub date: DateTime<Utc>,
    pub is_complete: bool,
    pub conducted_by_uid: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InventorySession {
    #[must_use]
    pub const fn term_key(&self) -> TermKey {
        TermKey::new(self.term, self.term_year)
    }
}
