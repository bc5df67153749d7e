use serde::Serialize;

use av_core::entities::Item;
use av_core::resolve::CountSource;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemDetail {
    #[serde(flatten)]
    item: Item,
    category_name: Option<String>,
    latest_quantity: i64,
    previous_quantity: i64,
    change: i64,
    latest: Option<CountSource>,
    previous: Option<CountSource>,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let item = ctx.service.get_item(id).await?;
    let category_name = ctx
        .service
        .get_category(&item.category_id)
        .await
        .ok()
        .map(|category| category.name);
    let resolved = ctx.service.resolve_item_count(id).await?;

    let detail = ItemDetail {
        item,
        category_name,
        latest_quantity: resolved.latest_quantity(),
        previous_quantity: resolved.previous_quantity(),
        change: resolved.change(),
        latest: resolved.latest,
        previous: resolved.previous,
    };
    output(&detail, flags.format)
}
