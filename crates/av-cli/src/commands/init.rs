use serde::Serialize;

use av_config::PROJECT_DIR;
use av_core::entities::User;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitResponse {
    project_root: String,
    database: String,
    synced: bool,
    user: User,
    bootstrapped: bool,
}

/// Handle `avault init`.
///
/// The store is created when the context opens it. The configured identity
/// becomes an authorized admin only while no admin exists yet; afterwards
/// `init` just records a sign-in.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let identity = ctx.require_identity()?;
    std::fs::create_dir_all(ctx.project_root.join(PROJECT_DIR))?;

    let has_admin = ctx
        .service
        .list_users()
        .await?
        .iter()
        .any(|user| user.is_admin);

    let (user, bootstrapped) = if has_admin {
        (ctx.sign_in(None).await?, false)
    } else {
        let user = ctx
            .service
            .bootstrap_admin(&identity.uid, &identity.email, identity.display_name())
            .await?;
        (user, true)
    };

    if !flags.quiet && bootstrapped {
        eprintln!("Registered {} as the first administrator.", user.email);
    }

    let response = InitResponse {
        project_root: ctx.project_root.display().to_string(),
        database: ctx.config.store.db_path.clone(),
        synced: ctx.service.is_synced_replica(),
        user,
        bootstrapped,
    };
    output(&response, flags.format)
}
