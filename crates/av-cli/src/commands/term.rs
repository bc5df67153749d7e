use av_core::calendar::current_term;
use av_core::enums::TermType;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TermCommands;
use crate::commands::shared::parse::parse_date;
use crate::context::AppContext;
use crate::output::output;

/// Handle `avault term`.
pub async fn handle(
    action: &TermCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TermCommands::List => {
            let terms = ctx.service.list_terms().await?;
            output(&terms, flags.format)
        }
        TermCommands::Current { date } => {
            let date = match date {
                Some(raw) => parse_date(raw, "date")?,
                None => chrono::Local::now().date_naive(),
            };
            output(&current_term(date), flags.format)
        }
        TermCommands::Ensure {
            term,
            year,
            start,
            end,
        } => {
            let term: TermType = term.parse()?;
            let start = start.as_deref().map(|raw| parse_date(raw, "start")).transpose()?;
            let end = end.as_deref().map(|raw| parse_date(raw, "end")).transpose()?;
            let stored = ctx.service.ensure_term(term, *year, start, end).await?;
            output(&stored, flags.format)
        }
    }
}
