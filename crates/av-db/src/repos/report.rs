//! Loads the rows every report reads into one owned snapshot.

use av_core::entities::{
    AcademicTerm, Category, HistoricalCount, InventorySession, Item, SessionCount,
};
use av_core::report::InventoryView;
use av_core::resolve::most_recent_session;

use crate::error::DatabaseError;
use crate::service::AvService;

/// Owned copy of the inventory tables. Only the most recent session's live
/// counts are loaded; older sessions are represented by historical counts.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    pub terms: Vec<AcademicTerm>,
    pub history: Vec<HistoricalCount>,
    pub sessions: Vec<InventorySession>,
    pub live_counts: Vec<SessionCount>,
}

impl InventorySnapshot {
    #[must_use]
    pub fn view(&self) -> InventoryView<'_> {
        InventoryView {
            categories: &self.categories,
            items: &self.items,
            terms: &self.terms,
            history: &self.history,
            sessions: &self.sessions,
            session_counts: &self.live_counts,
        }
    }
}

impl AvService {
    pub async fn load_snapshot(&self) -> Result<InventorySnapshot, DatabaseError> {
        let sessions = self.list_sessions().await?;
        let live_counts = match most_recent_session(&sessions) {
            Some(latest) => self.list_session_counts(&latest.id).await?,
            None => Vec::new(),
        };

        Ok(InventorySnapshot {
            categories: self.list_categories().await?,
            items: self.list_items(None).await?,
            terms: self.list_terms().await?,
            history: self.list_historical_counts(None).await?,
            sessions,
            live_counts,
        })
    }
}
