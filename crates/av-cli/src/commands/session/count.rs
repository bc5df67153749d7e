use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    session_id: &str,
    item_id: &str,
    quantity: i64,
    notes: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let counted_by = ctx.identity().map(|identity| identity.uid.as_str());
    let count = ctx
        .service
        .record_count(session_id, item_id, quantity, counted_by, notes)
        .await?;
    output(&count, flags.format)
}
