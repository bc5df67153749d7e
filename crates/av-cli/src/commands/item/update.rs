use anyhow::bail;
use av_db::updates::item::ItemUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::clearable;
use crate::context::AppContext;
use crate::output::output;

pub struct Fields<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub location: Option<&'a str>,
    pub condition: Option<&'a str>,
    pub serial_frequency: Option<&'a str>,
    pub notes: Option<&'a str>,
}

pub async fn run(
    id: &str,
    fields: Fields<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut builder = ItemUpdateBuilder::new();
    if let Some(name) = fields.name {
        builder = builder.name(name);
    }
    if let Some(category) = fields.category {
        builder = builder.category_id(category);
    }
    if let Some(location) = clearable(fields.location) {
        builder = builder.location(location);
    }
    if let Some(condition) = clearable(fields.condition) {
        builder = builder.condition(condition);
    }
    if let Some(serial_frequency) = clearable(fields.serial_frequency) {
        builder = builder.serial_frequency(serial_frequency);
    }
    if let Some(notes) = clearable(fields.notes) {
        builder = builder.notes(notes);
    }

    let update = builder.build();
    if update.is_empty() {
        bail!("nothing to update: pass at least one field");
    }

    let item = ctx.service.update_item(id, &update).await?;
    output(&item, flags.format)
}
