use av_db::updates::item::NewItem;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub struct Fields<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub location: Option<&'a str>,
    pub condition: Option<&'a str>,
    pub serial_frequency: Option<&'a str>,
    pub notes: Option<&'a str>,
}

pub async fn run(fields: Fields<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut new = NewItem::new(fields.name, fields.category);
    if let Some(location) = fields.location {
        new = new.location(location);
    }
    if let Some(condition) = fields.condition {
        new = new.condition(condition);
    }
    if let Some(serial_frequency) = fields.serial_frequency {
        new = new.serial_frequency(serial_frequency);
    }
    if let Some(notes) = fields.notes {
        new = new.notes(notes);
    }

    let item = ctx.service.create_item(&new).await?;
    output(&item, flags.format)
}
