//! Response types returned by multi-step store operations and printed by the CLI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Category;

/// Outcome of copying a session's live counts into historical counts.
///
/// Upserts are independent; `failed` lists the items that could not be
/// written. The session is complete either way, and re-running completion
/// retries the failed items without duplicating the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub session_id: String,
    pub academic_term_id: String,
    pub term_name: String,
    pub upserted: u32,
    pub failed: Vec<SyncFailure>,
}

impl SyncReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub item_id: String,
    pub error: String,
}

/// How far a session has progressed through the item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub session_id: String,
    pub counted: u32,
    pub total: u32,
    pub percent: f64,
}

impl SessionProgress {
    #[must_use]
    pub fn new(session_id: impl Into<String>, counted: u32, total: u32) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            f64::from(counted) / f64::from(total) * 100.0
        };
        Self {
            session_id: session_id.into(),
            counted,
            total,
            percent,
        }
    }
}

/// A category together with the number of items that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsage {
    #[serde(flatten)]
    pub category: Category,
    pub item_count: u32,
}

/// Outcome of folding completed sessions' live counts into historical counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub sessions: u32,
    pub counts: u32,
    pub failed: Vec<SyncFailure>,
}

/// Totals from a JSON inventory import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub categories: u32,
    pub items: u32,
    pub terms: u32,
    pub historical_counts: u32,
    pub skipped_periods: Vec<String>,
    /// `item / period: value` for count cells that were not whole quantities.
    pub skipped_counts: Vec<String>,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percent() {
        let p = SessionProgress::new("ses-1", 1, 4);
        assert!((p.percent - 25.0).abs() < f64::EPSILON);
        assert!(SessionProgress::new("ses-1", 0, 0).percent.abs() < f64::EPSILON);
    }
}
