//! Category repository: CRUD, usage counts, and the deletion guard.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;

use av_core::entities::Category;
use av_core::ids::PREFIX_CATEGORY;
use av_core::responses::CategoryUsage;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, require_text};
use crate::service::AvService;

const SELECT_COLS: &str = "id, name, created_at";

fn row_to_category(row: &libsql::Row) -> Result<Category, DatabaseError> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl AvService {
    pub async fn create_category(&self, name: &str) -> Result<Category, DatabaseError> {
        let name = require_text("Category name", name)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CATEGORY).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO categories ({SELECT_COLS}) VALUES (?1, ?2, ?3)"),
                libsql::params![id.as_str(), name.as_str(), now.to_rfc3339()],
            )
            .await?;

        tracing::debug!(%id, %name, "category created");
        Ok(Category {
            id,
            name,
            created_at: now,
        })
    }

    pub async fn get_category(&self, id: &str) -> Result<Category, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM categories WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("Category", id))?;
        row_to_category(&row)
    }

    /// Case-insensitive lookup on the trimmed name.
    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM categories
                     WHERE lower(name) = lower(?1) ORDER BY created_at LIMIT 1"
                ),
                [name.trim()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    /// All categories, sorted by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM categories ORDER BY name COLLATE NOCASE"),
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    pub async fn rename_category(&self, id: &str, name: &str) -> Result<Category, DatabaseError> {
        let name = require_text("Category name", name)?;
        let current = self.get_category(id).await?;
        self.db()
            .conn()
            .execute(
                "UPDATE categories SET name = ?1 WHERE id = ?2",
                libsql::params![name.as_str(), id],
            )
            .await?;
        Ok(Category { name, ..current })
    }

    /// Every category with the number of items referencing it.
    pub async fn count_items_by_category(&self) -> Result<Vec<CategoryUsage>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT c.id, c.name, c.created_at, COUNT(i.id)
                 FROM categories c LEFT JOIN items i ON i.category_id = c.id
                 GROUP BY c.id ORDER BY c.name COLLATE NOCASE",
                (),
            )
            .await?;
        let mut usage = Vec::new();
        while let Some(row) = rows.next().await? {
            let count = row.get::<i64>(3)?;
            usage.push(CategoryUsage {
                category: row_to_category(&row)?,
                item_count: u32::try_from(count).unwrap_or(u32::MAX),
            });
        }
        Ok(usage)
    }

    async fn item_ids_in_category(&self, id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id FROM items WHERE category_id = ?1", [id])
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }

    /// Delete an unused category.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::CategoryInUse` while any item references it.
    pub async fn delete_category(&self, id: &str) -> Result<(), DatabaseError> {
        self.get_category(id).await?;
        let in_use = self.item_ids_in_category(id).await?.len();
        if in_use > 0 {
            return Err(DatabaseError::CategoryInUse {
                count: u32::try_from(in_use).unwrap_or(u32::MAX),
            });
        }
        self.db()
            .conn()
            .execute("DELETE FROM categories WHERE id = ?1", [id])
            .await?;
        tracing::debug!(%id, "category deleted");
        Ok(())
    }

    /// Move every item of category `id` to its assigned category, then delete `id`.
    ///
    /// `assignments` maps item id to target category id and must cover every
    /// item in the category. Returns the number of items moved.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if an item is unassigned, a target
    /// is the category being deleted, or a target does not exist.
    pub async fn reassign_and_delete_category(
        &self,
        id: &str,
        assignments: &HashMap<String, String>,
    ) -> Result<u32, DatabaseError> {
        self.get_category(id).await?;
        let items = self.item_ids_in_category(id).await?;

        let unassigned = items
            .iter()
            .filter(|item| assignments.get(*item).is_none_or(|t| t.trim().is_empty()))
            .count();
        if unassigned > 0 {
            return Err(DatabaseError::Validation(format!(
                "{unassigned} item(s) have not been assigned a new category"
            )));
        }

        let mut by_target: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for item in &items {
            if let Some(target) = assignments.get(item) {
                by_target.entry(target.as_str()).or_default().push(item.as_str());
            }
        }

        for target in by_target.keys() {
            if *target == id {
                return Err(DatabaseError::Validation(
                    "Items cannot be reassigned to the category being deleted".into(),
                ));
            }
            if let Err(DatabaseError::NotFound { .. }) = self.get_category(target).await {
                return Err(DatabaseError::Validation(format!(
                    "Target category {target} does not exist"
                )));
            }
        }

        let tx = self.db().conn().transaction().await?;
        for (target, item_ids) in &by_target {
            let placeholders: Vec<String> = (2..item_ids.len() + 2).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "UPDATE items SET category_id = ?1 WHERE id IN ({})",
                placeholders.join(", ")
            );
            let mut params: Vec<libsql::Value> = vec![(*target).into()];
            params.extend(item_ids.iter().map(|i| libsql::Value::from(*i)));
            tx.execute(&sql, libsql::params_from_iter(params)).await?;
        }
        tx.execute("DELETE FROM categories WHERE id = ?1", [id]).await?;
        tx.commit().await?;

        tracing::info!(%id, moved = items.len(), targets = by_target.len(), "category reassigned and deleted");
        Ok(u32::try_from(items.len()).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_category, seed_item, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_trims_and_rejects_blank() {
        let svc = test_service().await;
        let cat = svc.create_category("  Cables ").await.unwrap();
        assert_eq!(cat.name, "Cables");
        assert!(matches!(
            svc.create_category("   ").await,
            Err(DatabaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_sorted_by_name() {
        let svc = test_service().await;
        seed_category(&svc, "wired mics").await;
        seed_category(&svc, "Cables").await;
        let names: Vec<String> = svc
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Cables", "wired mics"]);
    }

    #[tokio::test]
    async fn find_by_name_ignores_case() {
        let svc = test_service().await;
        let cat = seed_category(&svc, "WIRED MICS").await;
        let found = svc.find_category_by_name(" wired mics").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(cat.id));
        assert!(svc.find_category_by_name("cables").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rename_missing_category_is_not_found() {
        let svc = test_service().await;
        assert!(matches!(
            svc.rename_category("cat-missing", "X").await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn usage_counts_include_empty_categories() {
        let svc = test_service().await;
        let mics = seed_category(&svc, "Mics").await;
        seed_category(&svc, "Cables").await;
        seed_item(&svc, "SM58", &mics.id).await;
        seed_item(&svc, "Beta 58", &mics.id).await;

        let usage: Vec<(String, u32)> = svc
            .count_items_by_category()
            .await
            .unwrap()
            .into_iter()
            .map(|u| (u.category.name, u.item_count))
            .collect();
        assert_eq!(usage, vec![("Cables".into(), 0), ("Mics".into(), 2)]);
    }
}
