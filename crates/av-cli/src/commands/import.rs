use anyhow::Context;
use av_core::import::InventoryDocument;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `avault import <file>`.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file))?;
    let doc: InventoryDocument = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid inventory document", args.file))?;

    let total = doc
        .categories
        .iter()
        .map(|category| category.items.len() as u64)
        .sum();
    let progress = Progress::bar(total, "importing", flags.quiet);

    let stats = ctx
        .service
        .import_inventory(&doc, |item| {
            progress.set_message(&item.name);
            progress.inc(1);
        })
        .await?;

    progress.finish_ok(&format!(
        "{} items, {} counts",
        stats.items, stats.historical_counts
    ));
    for error in &stats.errors {
        tracing::warn!(%error, "import row failed");
    }
    output(&stats, flags.format)
}
