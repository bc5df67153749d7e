use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A live count inside one session. Unique per `(item_id, session_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCount {
    pub id: String,
    pub item_id: String,
    pub session_id: String,
    pub counted_quantity: i64,
    pub counted_by_uid: Option<String>,
    pub counted_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// The durable per-item-per-term quantity. Unique per `(item_id, academic_term_id)`.
///
/// `session_id` is set when the row was written by a session completion; rows
/// from the bulk import have none.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalCount {
    pub id: String,
    pub item_id: String,
    pub academic_term_id: String,
    pub counted_quantity: i64,
    pub imported_at: DateTime<Utc>,
    pub session_id: Option<String>,
    pub counted_by_uid: Option<String>,
    pub notes: Option<String>,
}
