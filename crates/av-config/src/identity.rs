//! Operator identity.

use serde::{Deserialize, Serialize};

/// The person running the CLI. Gated commands look this uid up in the
/// `users` table to decide whether they may proceed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub uid: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub display_name: String,
}

impl IdentityConfig {
    pub fn is_configured(&self) -> bool {
        !self.uid.is_empty() && !self.email.is_empty()
    }

    pub fn display_name(&self) -> Option<&str> {
        (!self.display_name.is_empty()).then_some(self.display_name.as_str())
    }
}
