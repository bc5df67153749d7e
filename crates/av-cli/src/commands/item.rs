mod create;
mod delete;
mod get;
mod list;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ItemCommands;
use crate::context::AppContext;

/// Handle `avault item`.
pub async fn handle(
    action: &ItemCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ItemCommands::Create {
            name,
            category,
            location,
            condition,
            serial_frequency,
            notes,
        } => {
            create::run(
                create::Fields {
                    name,
                    category,
                    location: location.as_deref(),
                    condition: condition.as_deref(),
                    serial_frequency: serial_frequency.as_deref(),
                    notes: notes.as_deref(),
                },
                ctx,
                flags,
            )
            .await
        }
        ItemCommands::List {
            category,
            search,
            limit,
        } => list::run(category.as_deref(), search.as_deref(), *limit, ctx, flags).await,
        ItemCommands::Get { id } => get::run(id, ctx, flags).await,
        ItemCommands::Update {
            id,
            name,
            category,
            location,
            condition,
            serial_frequency,
            notes,
        } => {
            update::run(
                id,
                update::Fields {
                    name: name.as_deref(),
                    category: category.as_deref(),
                    location: location.as_deref(),
                    condition: condition.as_deref(),
                    serial_frequency: serial_frequency.as_deref(),
                    notes: notes.as_deref(),
                },
                ctx,
                flags,
            )
            .await
        }
        ItemCommands::Delete { id } => delete::run(id, ctx, flags).await,
    }
}
