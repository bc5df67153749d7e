use crate::cli::GlobalFlags;
use crate::commands::shared::limit::{apply_limit, effective_limit};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    category: Option<&str>,
    search: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut items = ctx.service.list_items(category).await?;
    if let Some(query) = search {
        items.retain(|item| item.matches_search(query));
    }

    apply_limit(&mut items, effective_limit(limit, flags.limit, u32::MAX));
    output(&items, flags.format)
}
