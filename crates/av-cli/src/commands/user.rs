use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `avault user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Login { photo_url } => {
            let user = ctx.sign_in(photo_url.as_deref()).await?;
            if !user.is_authorized && !flags.quiet {
                eprintln!("Signed in. An administrator must authorize this account before use.");
            }
            output(&user, flags.format)
        }
        UserCommands::List => {
            let users = ctx.service.list_users().await?;
            output(&users, flags.format)
        }
        UserCommands::Authorize { uid } => {
            let user = ctx.service.authorize_user(uid).await?;
            output(&user, flags.format)
        }
        UserCommands::Revoke { uid } => {
            refuse_self(uid, ctx)?;
            let user = ctx.service.revoke_user(uid).await?;
            output(&user, flags.format)
        }
        UserCommands::Admin { uid, revoke } => {
            if *revoke {
                refuse_self(uid, ctx)?;
            }
            let user = ctx.service.set_admin(uid, !*revoke).await?;
            output(&user, flags.format)
        }
        UserCommands::Delete { uid } => {
            refuse_self(uid, ctx)?;
            ctx.service.delete_user(uid).await?;
            output(&json!({ "uid": uid, "deleted": true }), flags.format)
        }
    }
}

/// An admin cannot lock themselves out.
fn refuse_self(uid: &str, ctx: &AppContext) -> anyhow::Result<()> {
    if ctx.identity().is_some_and(|identity| identity.uid == uid) {
        anyhow::bail!("refusing to remove your own access; ask another administrator");
    }
    Ok(())
}
