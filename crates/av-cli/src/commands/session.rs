mod complete;
mod count;
mod create;

use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::commands::shared::limit::{apply_limit, effective_limit};
use crate::context::AppContext;
use crate::output::output;

/// Handle `avault session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Create { name, date, notes } => {
            create::run(name, date.as_deref(), notes.as_deref(), ctx, flags).await
        }
        SessionCommands::List { limit } => {
            let mut sessions = ctx.service.list_sessions().await?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            apply_limit(&mut sessions, limit);
            output(&sessions, flags.format)
        }
        SessionCommands::Get { id } => {
            let session = ctx.service.get_session(id).await?;
            output(&session, flags.format)
        }
        SessionCommands::Count {
            session,
            item,
            quantity,
            notes,
        } => count::run(session, item, *quantity, notes.as_deref(), ctx, flags).await,
        SessionCommands::Counts { session } => {
            ctx.service.get_session(session).await?;
            let counts = ctx.service.list_session_counts(session).await?;
            output(&counts, flags.format)
        }
        SessionCommands::Progress { session } => {
            let progress = ctx.service.session_progress(session).await?;
            output(&progress, flags.format)
        }
        SessionCommands::Complete { session } => complete::run(session, ctx, flags).await,
        SessionCommands::Reopen { session } => {
            let reopened = ctx.service.reopen_session(session).await?;
            output(&reopened, flags.format)
        }
        SessionCommands::Delete { session } => {
            ctx.service.delete_session(session).await?;
            output(&json!({ "id": session, "deleted": true }), flags.format)
        }
    }
}
