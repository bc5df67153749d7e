use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CategoryCommands;
use crate::commands::shared::parse::parse_assignments;
use crate::context::AppContext;
use crate::output::output;

/// Handle `avault category`.
pub async fn handle(
    action: &CategoryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CategoryCommands::Create { name } => {
            let category = ctx.service.create_category(name).await?;
            output(&category, flags.format)
        }
        CategoryCommands::List => {
            let usage = ctx.service.count_items_by_category().await?;
            output(&usage, flags.format)
        }
        CategoryCommands::Rename { id, name } => {
            let category = ctx.service.rename_category(id, name).await?;
            output(&category, flags.format)
        }
        CategoryCommands::Delete { id, reassign } => {
            if reassign.is_empty() {
                ctx.service.delete_category(id).await?;
                return output(&json!({ "id": id, "deleted": true, "reassigned": 0 }), flags.format);
            }

            let assignments = parse_assignments(reassign)?;
            let moved = ctx
                .service
                .reassign_and_delete_category(id, &assignments)
                .await?;
            output(
                &json!({ "id": id, "deleted": true, "reassigned": moved }),
                flags.format,
            )
        }
    }
}
