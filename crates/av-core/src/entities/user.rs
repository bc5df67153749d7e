use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A staff account. `id` is the identity provider UID.
///
/// New users are created with `is_authorized = false`; an admin grants access.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub is_admin: bool,
    pub is_authorized: bool,
    pub last_login_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
