use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `avault migrate-counts`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.service.migrate_legacy_counts().await?;
    output(&report, flags.format)?;

    if !report.failed.is_empty() {
        bail!(
            "{} count(s) could not be migrated; re-run `avault migrate-counts` to retry",
            report.failed.len()
        );
    }
    Ok(())
}
