//! # av-config
//!
//! Layered configuration loading for AVault using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`AVAULT_*` prefix, `__` as separator)
//! 2. Project-level `.avault/config.toml`
//! 3. User-level `~/.config/avault/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `AVAULT_STORE__URL` -> `store.url`, `AVAULT_IDENTITY__UID` -> `identity.uid`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use av_config::AvConfig;
//!
//! let config = AvConfig::load_with_dotenv().expect("config");
//!
//! if config.store.is_configured() {
//!     println!("Remote store: {}", config.store.url);
//! }
//! ```

mod error;
mod general;
mod identity;
mod server;
mod store;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use identity::IdentityConfig;
pub use server::{DEFAULT_BIND, ServerConfig};
pub use store::{DEFAULT_DB_PATH, StoreConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project directory holding `config.toml` and the default database file.
pub const PROJECT_DIR: &str = ".avault";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AvConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl AvConfig {
    /// Load configuration from all sources, with the current directory as the
    /// project root.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration for an explicit project root (the `--project` flag).
    ///
    /// A relative `store.db_path` is resolved against `root`.
    pub fn load_for_project(root: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::from_path(root.join(".env"));
        let mut config: Self = Self::figment_at(root).extract()?;
        config.resolve_paths(root);
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_at(Path::new("."))
    }

    /// Build the figment provider chain with the project config under `root`.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment_at(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = Self::project_config_path(root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("AVAULT_").split("__"))
    }

    /// Path to the project-level config file under `root`.
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR).join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("avault").join("config.toml"))
    }

    fn resolve_paths(&mut self, root: &Path) {
        for path in [&mut self.store.db_path, &mut self.store.local_replica_path] {
            if !path.is_empty() && Path::new(path.as_str()).is_relative() && path != ":memory:" {
                *path = root.join(path.as_str()).to_string_lossy().into_owned();
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if !self.store.url.is_empty() && self.store.auth_token.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.auth_token".into(),
                reason: "required when store.url is set".into(),
            });
        }
        Ok(())
    }

    /// Human-readable warnings for degraded but usable configurations.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.store.is_configured() {
            warnings.push(format!(
                "remote store not configured; using local database at {}",
                self.store.db_path
            ));
        }
        if !self.identity.is_configured() {
            warnings.push(
                "identity not configured; set identity.uid and identity.email to use gated commands"
                    .to_string(),
            );
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = AvConfig::default();
        assert!(!config.store.is_configured());
        assert!(!config.identity.is_configured());
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn default_config_warns_twice() {
        let warnings = AvConfig::default().warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains(DEFAULT_DB_PATH));
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let mut config = AvConfig::default();
        config.store.local_replica_path = ":memory:".into();
        config.resolve_paths(Path::new("/srv/avault"));
        assert_eq!(config.store.db_path, "/srv/avault/.avault/avault.db");
        assert_eq!(config.store.local_replica_path, ":memory:");
    }

    #[test]
    fn url_without_token_is_invalid() {
        let mut config = AvConfig::default();
        config.store.url = "libsql://avault.turso.io".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
