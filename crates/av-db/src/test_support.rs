//! Shared fixtures for in-crate tests.

use av_core::entities::{Category, InventorySession, Item};
use chrono::{TimeZone, Utc};

use crate::service::AvService;
use crate::updates::item::NewItem;

/// In-memory service with the schema applied.
pub async fn test_service() -> AvService {
    AvService::new_local(":memory:").await.unwrap()
}

pub async fn seed_category(svc: &AvService, name: &str) -> Category {
    svc.create_category(name).await.unwrap()
}

pub async fn seed_item(svc: &AvService, name: &str, category_id: &str) -> Item {
    svc.create_item(&NewItem::new(name, category_id)).await.unwrap()
}

/// A draft session dated in FALL 2024.
pub async fn seed_session(svc: &AvService, name: &str) -> InventorySession {
    let date = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
    svc.create_session(name, None, Some("u-tech"), date)
        .await
        .unwrap()
}
