//! Item repository.

use chrono::Utc;

use av_core::entities::Item;
use av_core::ids::PREFIX_ITEM;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_value, optional_text, parse_datetime, require_text};
use crate::service::AvService;
use crate::updates::item::{ItemUpdate, NewItem};

const SELECT_COLS: &str =
    "id, name, category_id, location, condition, serial_frequency, notes, created_at";

fn row_to_item(row: &libsql::Row) -> Result<Item, DatabaseError> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        category_id: row.get(2)?,
        location: get_opt_string(row, 3)?,
        condition: get_opt_string(row, 4)?,
        serial_frequency: get_opt_string(row, 5)?,
        notes: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl AvService {
    /// Create an item. The category must exist at creation time.
    pub async fn create_item(&self, new: &NewItem) -> Result<Item, DatabaseError> {
        let name = require_text("Item name", &new.name)?;
        let category_id = require_text("Category", &new.category_id)?;
        self.require_category(&category_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ITEM).await?;
        let item = Item {
            id,
            name,
            category_id,
            location: optional_text(new.location.as_deref()),
            condition: optional_text(new.condition.as_deref()),
            serial_frequency: optional_text(new.serial_frequency.as_deref()),
            notes: optional_text(new.notes.as_deref()),
            created_at: now,
        };

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO items ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    item.id.as_str(),
                    item.name.as_str(),
                    item.category_id.as_str(),
                    opt_value(item.location.as_deref()),
                    opt_value(item.condition.as_deref()),
                    opt_value(item.serial_frequency.as_deref()),
                    opt_value(item.notes.as_deref()),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(id = %item.id, name = %item.name, "item created");
        Ok(item)
    }

    pub async fn get_item(&self, id: &str) -> Result<Item, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM items WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("Item", id))?;
        row_to_item(&row)
    }

    /// Items sorted by name, optionally restricted to one category.
    pub async fn list_items(&self, category_id: Option<&str>) -> Result<Vec<Item>, DatabaseError> {
        let mut rows = match category_id {
            Some(category_id) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM items WHERE category_id = ?1
                             ORDER BY name COLLATE NOCASE, id"
                        ),
                        [category_id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!("SELECT {SELECT_COLS} FROM items ORDER BY name COLLATE NOCASE, id"),
                        (),
                    )
                    .await?
            }
        };

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_item(&row)?);
        }
        Ok(items)
    }

    /// Find an item by exact (case-insensitive) name inside a category.
    pub async fn find_item(&self, name: &str, category_id: &str) -> Result<Option<Item>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM items
                     WHERE lower(name) = lower(?1) AND category_id = ?2 LIMIT 1"
                ),
                libsql::params![name.trim(), category_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<Item, DatabaseError> {
        let current = self.get_item(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(require_text("Item name", name)?.into());
            idx += 1;
        }
        if let Some(ref category_id) = update.category_id {
            let category_id = require_text("Category", category_id)?;
            self.require_category(&category_id).await?;
            sets.push(format!("category_id = ?{idx}"));
            params.push(category_id.into());
            idx += 1;
        }
        for (column, value) in [
            ("location", &update.location),
            ("condition", &update.condition),
            ("serial_frequency", &update.serial_frequency),
            ("notes", &update.notes),
        ] {
            if let Some(value) = value {
                sets.push(format!("{column} = ?{idx}"));
                params.push(opt_value(optional_text(value.as_deref()).as_deref()));
                idx += 1;
            }
        }

        params.push(id.into());
        let sql = format!("UPDATE items SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        tracing::debug!(%id, "item updated");
        self.get_item(id).await
    }

    /// Delete an item together with its live and historical counts.
    pub async fn delete_item(&self, id: &str) -> Result<(), DatabaseError> {
        self.get_item(id).await?;
        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM session_counts WHERE item_id = ?1", [id])
            .await?;
        tx.execute("DELETE FROM historical_counts WHERE item_id = ?1", [id])
            .await?;
        tx.execute("DELETE FROM items WHERE id = ?1", [id]).await?;
        tx.commit().await?;
        tracing::debug!(%id, "item deleted");
        Ok(())
    }

    pub async fn count_items(&self) -> Result<u32, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM items", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(u32::try_from(row.get::<i64>(0)?).unwrap_or(u32::MAX))
    }

    async fn require_category(&self, category_id: &str) -> Result<(), DatabaseError> {
        match self.get_category(category_id).await {
            Ok(_) => Ok(()),
            Err(DatabaseError::NotFound { .. }) => Err(DatabaseError::Validation(format!(
                "Category {category_id} does not exist"
            ))),
            Err(e) => Err(e),
        }
    }
}
