//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list and trend commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Sync the embedded replica before running read commands.
    #[serde(default)]
    pub sync_on_read: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            sync_on_read: false,
        }
    }
}
