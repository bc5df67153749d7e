//! Bulk import of the JSON inventory document.
//!
//! Row-level problems are collected in `ImportStats::errors` and the import
//! keeps going. Re-importing the same document updates counts in place: items
//! are matched by name within their category and counts upsert on
//! `(item, term)`.

use std::collections::{HashMap, HashSet};

use av_core::calendar::parse_term_label;
use av_core::import::{CountCell, ImportItem, InventoryDocument};
use av_core::responses::ImportStats;

use crate::error::DatabaseError;
use crate::service::AvService;
use crate::updates::item::NewItem;

impl AvService {
    /// Import `doc`, calling `on_item` once per item row processed.
    pub async fn import_inventory<F>(
        &self,
        doc: &InventoryDocument,
        mut on_item: F,
    ) -> Result<ImportStats, DatabaseError>
    where
        F: FnMut(&ImportItem),
    {
        let mut stats = ImportStats::default();

        // Period label -> academic term id.
        let mut terms: HashMap<String, String> = HashMap::new();
        let (parsed, skipped) = doc.periods();
        for (label, key) in parsed {
            let term = self.find_or_create_term(key.term, key.year).await?;
            terms.insert(label, term.id);
        }
        for label in skipped {
            tracing::warn!(period = %label, "skipping period without a recognizable term");
            stats.skipped_periods.push(label);
        }

        for category in &doc.categories {
            let category_id = match self.import_category(&category.name, &mut stats).await {
                Ok(id) => id,
                Err(e) => {
                    stats.errors.push(format!("category '{}': {e}", category.name));
                    category.items.iter().for_each(&mut on_item);
                    continue;
                }
            };

            for item in &category.items {
                on_item(item);
                if let Err(e) = self
                    .import_item(item, &category_id, &mut terms, &mut stats)
                    .await
                {
                    stats.errors.push(format!("item '{}': {e}", item.name));
                }
            }
        }

        stats.terms = u32::try_from(terms.values().collect::<HashSet<_>>().len())
            .unwrap_or(u32::MAX);
        tracing::info!(
            categories = stats.categories,
            items = stats.items,
            counts = stats.historical_counts,
            skipped_counts = stats.skipped_counts.len(),
            errors = stats.errors.len(),
            "import finished"
        );
        Ok(stats)
    }

    async fn import_category(&self, name: &str, stats: &mut ImportStats) -> Result<String, DatabaseError> {
        if let Some(existing) = self.find_category_by_name(name).await? {
            return Ok(existing.id);
        }
        let created = self.create_category(name).await?;
        stats.categories += 1;
        Ok(created.id)
    }

    async fn import_item(
        &self,
        row: &ImportItem,
        category_id: &str,
        terms: &mut HashMap<String, String>,
        stats: &mut ImportStats,
    ) -> Result<(), DatabaseError> {
        let item_id = match self.find_item(&row.name, category_id).await? {
            Some(existing) => existing.id,
            None => {
                let mut new = NewItem::new(row.name.as_str(), category_id);
                new.location.clone_from(&row.location);
                new.condition.clone_from(&row.condition);
                new.serial_frequency.clone_from(&row.serial_number_frequency);
                let created = self.create_item(&new).await?;
                stats.items += 1;
                created.id
            }
        };

        for (period, cell) in row.count_cells() {
            let quantity = match cell {
                CountCell::Quantity(quantity) => quantity,
                CountCell::Blank => continue,
                CountCell::Unusable(value) => {
                    tracing::warn!(item = %row.name, %period, %value, "skipping unusable count");
                    stats
                        .skipped_counts
                        .push(format!("{} / {period}: {value}", row.name));
                    continue;
                }
            };
            let term_id = match terms.get(period) {
                Some(id) => id.clone(),
                None => {
                    // Labels used on items but not declared in the metadata.
                    let Some(key) = parse_term_label(period) else {
                        if !stats.skipped_periods.iter().any(|p| p == period) {
                            tracing::warn!(%period, "skipping period without a recognizable term");
                            stats.skipped_periods.push(period.to_string());
                        }
                        continue;
                    };
                    let term = self.find_or_create_term(key.term, key.year).await?;
                    terms.insert(period.to_string(), term.id.clone());
                    term.id
                }
            };
            self.upsert_historical_count(&item_id, &term_id, quantity, None, None, None)
                .await?;
            stats.historical_counts += 1;
        }
        Ok(())
    }
}
