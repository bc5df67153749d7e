use std::path::PathBuf;

use anyhow::Context;
use av_config::{AvConfig, IdentityConfig};
use av_core::entities::User;
use av_db::service::AvService;

pub const NOT_SIGNED_IN: &str = "not signed in: set identity.uid and identity.email \
     (AVAULT_IDENTITY__UID, AVAULT_IDENTITY__EMAIL) to use this command";

pub const ACCESS_DENIED: &str = "Access denied: your account is waiting for an administrator \
     to authorize it";

pub const ADMIN_REQUIRED: &str = "Access denied: administrator privileges are required for user management";

/// Shared application resources initialized once at startup.
///
/// Carries the store handle, configuration and operator identity explicitly;
/// nothing here lives in a global.
pub struct AppContext {
    pub service: AvService,
    pub config: AvConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the configured store. A remote replica that fails to open falls
    /// back to the local database file.
    pub async fn init(project_root: PathBuf, config: AvConfig) -> anyhow::Result<Self> {
        let service = if config.store.is_configured() {
            match AvService::from_config(&config.store).await {
                Ok(service) => service,
                Err(error) => {
                    tracing::warn!(
                        %error,
                        "failed to open synced replica; falling back to local database"
                    );
                    AvService::new_local(&config.store.db_path)
                        .await
                        .context("failed to initialize av-db service")?
                }
            }
        } else {
            AvService::new_local(&config.store.db_path)
                .await
                .context("failed to initialize av-db service")?
        };

        if config.general.sync_on_read && service.is_synced_replica() {
            service.sync().await.context("failed to sync with remote store")?;
        }

        Ok(Self {
            service,
            config,
            project_root,
        })
    }

    /// The configured operator identity, if complete.
    #[must_use]
    pub fn identity(&self) -> Option<&IdentityConfig> {
        Some(&self.config.identity).filter(|identity| identity.is_configured())
    }

    /// Fail with a "not signed in" error when no identity is configured.
    pub fn require_identity(&self) -> anyhow::Result<&IdentityConfig> {
        self.identity().ok_or_else(|| anyhow::anyhow!(NOT_SIGNED_IN))
    }

    /// Record a sign-in for the operator and return the stored user.
    pub async fn sign_in(&self, photo_url: Option<&str>) -> anyhow::Result<User> {
        let identity = self.require_identity()?;
        let user = self
            .service
            .login(
                &identity.uid,
                &identity.email,
                identity.display_name(),
                photo_url,
            )
            .await?;
        Ok(user)
    }

    /// Gate for inventory commands: the operator must be signed in and authorized.
    pub async fn require_authorized(&self) -> anyhow::Result<User> {
        let user = self.sign_in(None).await?;
        check_access(&user, false)?;
        Ok(user)
    }

    /// Gate for user administration.
    pub async fn require_admin(&self) -> anyhow::Result<User> {
        let user = self.sign_in(None).await?;
        check_access(&user, true)?;
        Ok(user)
    }
}

fn check_access(user: &User, admin: bool) -> anyhow::Result<()> {
    if !user.is_authorized {
        anyhow::bail!(ACCESS_DENIED);
    }
    if admin && !user.is_admin {
        anyhow::bail!(ADMIN_REQUIRED);
    }
    Ok(())
}
