use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Complete the session and print the sync report. The session stays
/// complete when some items fail; the command exits non-zero so the operator
/// re-runs it.
pub async fn run(session_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.service.complete_session(session_id).await?;
    output(&report, flags.format)?;

    if !report.is_clean() {
        bail!(
            "{} of {} count(s) failed to copy into {}; re-run `avault session complete {session_id}` to retry",
            report.failed.len(),
            report.failed.len() + report.upserted as usize,
            report.term_name,
        );
    }
    Ok(())
}
