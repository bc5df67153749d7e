use chrono::Utc;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_timestamp;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    date: Option<&str>,
    notes: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let date = match date {
        Some(raw) => parse_timestamp(raw, "date")?,
        None => Utc::now(),
    };
    let conducted_by = ctx.identity().map(|identity| identity.uid.as_str());

    let session = ctx
        .service
        .create_session(name, notes, conducted_by, date)
        .await?;
    output(&session, flags.format)
}
