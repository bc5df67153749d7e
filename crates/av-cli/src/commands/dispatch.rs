use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::cli::subcommands::{TermCommands, UserCommands};
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
///
/// Inventory commands pass the authorization gate first; `init`, `user login`
/// and `term current` only need what they check themselves.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match gate_for(&command) {
        Gate::None => {}
        Gate::Authorized => {
            ctx.require_authorized().await?;
        }
        Gate::Admin => {
            ctx.require_admin().await?;
        }
    }

    match command {
        Commands::Init => commands::init::handle(ctx, flags).await,
        Commands::Category { action } => commands::category::handle(&action, ctx, flags).await,
        Commands::Item { action } => commands::item::handle(&action, ctx, flags).await,
        Commands::Term { action } => commands::term::handle(&action, ctx, flags).await,
        Commands::Session { action } => commands::session::handle(&action, ctx, flags).await,
        Commands::Report { action } => commands::report::handle(&action, ctx, flags).await,
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::MigrateCounts => commands::migrate::handle(ctx, flags).await,
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Serve(args) => commands::serve::handle(&args, ctx, flags),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    None,
    Authorized,
    Admin,
}

fn gate_for(command: &Commands) -> Gate {
    match command {
        Commands::Init
        | Commands::Term {
            action: TermCommands::Current { .. },
        }
        | Commands::User {
            action: UserCommands::Login { .. },
        } => Gate::None,
        Commands::User { .. } | Commands::MigrateCounts | Commands::Import(_) => Gate::Admin,
        Commands::Category { .. }
        | Commands::Item { .. }
        | Commands::Term { .. }
        | Commands::Session { .. }
        | Commands::Report { .. }
        | Commands::Serve(_) => Gate::Authorized,
    }
}
