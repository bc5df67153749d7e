use anyhow::Context;
use av_core::calendar::parse_term_label;
use av_core::report::{self, ItemFilter};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `avault report`.
pub async fn handle(
    action: &ReportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let snapshot = ctx.service.load_snapshot().await?;
    let view = snapshot.view();

    match action {
        ReportCommands::Dashboard { search, category } => {
            let filter = ItemFilter {
                search: search.clone(),
                category_id: category.clone(),
            };
            let today = chrono::Local::now().date_naive();
            output(&report::dashboard(&view, &filter, today), flags.format)
        }
        ReportCommands::Trends { limit } => {
            let fallback = u32::try_from(report::DEFAULT_TREND_LIMIT).unwrap_or(u32::MAX);
            let limit = effective_limit(*limit, flags.limit, fallback);
            let trends = report::trends(&view, usize::try_from(limit).unwrap_or(usize::MAX));
            output(&trends, flags.format)
        }
        ReportCommands::Stale => output(&report::stale_items(&view), flags.format),
        ReportCommands::History { term } => {
            let term_id = match term.as_deref() {
                Some(raw) => Some(resolve_term_id(raw, ctx).await?),
                None => None,
            };
            let history = report::semester_history(&view, term_id.as_deref())
                .context("no academic terms with recorded counts yet")?;
            output(&history, flags.format)
        }
    }
}

/// Accept either a term id or a label such as `"Fall 2024"`.
async fn resolve_term_id(raw: &str, ctx: &AppContext) -> anyhow::Result<String> {
    let Some(key) = parse_term_label(raw) else {
        return Ok(ctx.service.get_term(raw).await?.id);
    };
    let term = ctx
        .service
        .find_term(key.term, key.year)
        .await?
        .with_context(|| format!("term {} not found", key.display_name()))?;
    Ok(term.id)
}
