use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A tracked piece of equipment.
///
/// `category_id` is a weak reference: nothing in the store prevents it from
/// pointing at a deleted category. Views group such items as "Uncategorized".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub serial_frequency: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Case-insensitive match against name, location, and serial/frequency.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(&needle));
        contains(Some(&self.name))
            || contains(self.location.as_deref())
            || contains(self.serial_frequency.as_deref())
    }
}
