//! Category deletion guard, reassignment, and JSON import integration tests.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use av_core::import::InventoryDocument;
use av_core::report::{self, ItemFilter};
use av_db::error::DatabaseError;
use av_db::service::AvService;
use av_db::updates::item::NewItem;

async fn test_service() -> AvService {
    AvService::new_local(":memory:").await.unwrap()
}

#[tokio::test]
async fn delete_fails_while_items_reference_category() {
    let svc = test_service().await;
    let mics = svc.create_category("Mics").await.unwrap();
    svc.create_item(&NewItem::new("SM58", &mics.id)).await.unwrap();
    svc.create_item(&NewItem::new("Beta 58", &mics.id)).await.unwrap();

    let err = svc.delete_category(&mics.id).await.unwrap_err();
    assert!(matches!(err, DatabaseError::CategoryInUse { count: 2 }));
    assert!(svc.get_category(&mics.id).await.is_ok());
}

#[tokio::test]
async fn delete_succeeds_when_empty() {
    let svc = test_service().await;
    let spare = svc.create_category("Spare").await.unwrap();
    svc.delete_category(&spare.id).await.unwrap();
    assert!(matches!(
        svc.get_category(&spare.id).await,
        Err(DatabaseError::NotFound { .. })
    ));
}

#[tokio::test]
async fn reassign_requires_every_item() {
    let svc = test_service().await;
    let mics = svc.create_category("Mics").await.unwrap();
    let wired = svc.create_category("Wired").await.unwrap();
    let a = svc.create_item(&NewItem::new("SM58", &mics.id)).await.unwrap();
    svc.create_item(&NewItem::new("Beta 58", &mics.id)).await.unwrap();

    let partial = HashMap::from([(a.id.clone(), wired.id.clone())]);
    let err = svc
        .reassign_and_delete_category(&mics.id, &partial)
        .await
        .unwrap_err();
    match err {
        DatabaseError::Validation(msg) => assert!(msg.starts_with("1 item(s)"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(svc.get_category(&mics.id).await.is_ok());
}

#[tokio::test]
async fn reassign_rejects_self_and_missing_targets() {
    let svc = test_service().await;
    let mics = svc.create_category("Mics").await.unwrap();
    let a = svc.create_item(&NewItem::new("SM58", &mics.id)).await.unwrap();

    let to_self = HashMap::from([(a.id.clone(), mics.id.clone())]);
    assert!(matches!(
        svc.reassign_and_delete_category(&mics.id, &to_self).await,
        Err(DatabaseError::Validation(_))
    ));

    let to_missing = HashMap::from([(a.id.clone(), "cat-missing".to_string())]);
    assert!(matches!(
        svc.reassign_and_delete_category(&mics.id, &to_missing).await,
        Err(DatabaseError::Validation(_))
    ));
}

#[tokio::test]
async fn reassign_moves_items_grouped_by_target() {
    let svc = test_service().await;
    let mics = svc.create_category("Mics").await.unwrap();
    let wired = svc.create_category("Wired").await.unwrap();
    let wireless = svc.create_category("Wireless").await.unwrap();
    let a = svc.create_item(&NewItem::new("SM58", &mics.id)).await.unwrap();
    let b = svc.create_item(&NewItem::new("Beta 58", &mics.id)).await.unwrap();
    let c = svc.create_item(&NewItem::new("ULXD2", &mics.id)).await.unwrap();

    let assignments = HashMap::from([
        (a.id.clone(), wired.id.clone()),
        (b.id.clone(), wired.id.clone()),
        (c.id.clone(), wireless.id.clone()),
    ]);
    let moved = svc
        .reassign_and_delete_category(&mics.id, &assignments)
        .await
        .unwrap();
    assert_eq!(moved, 3);
    assert!(svc.get_category(&mics.id).await.is_err());
    assert_eq!(svc.list_items(Some(&wired.id)).await.unwrap().len(), 2);
    assert_eq!(svc.get_item(&c.id).await.unwrap().category_id, wireless.id);
}

const DOC: &str = r#"{
    "metadata": {
        "title": "AV Inventory",
        "as_of": "2024-05-01",
        "inventory_periods": ["Fall 2023", "Spring 2024", "Comments"]
    },
    "categories": [
        { "name": "WIRED MICS",
          "items": [
            { "name": "SM58", "inventory_counts": { "Fall 2023": 10, "Spring 2024": 7 } },
            { "name": "Beta 87", "inventory_counts": { "Fall 2023": 2, "Spring 2024": "N/A", "Comments": null },
              "location": "Cage B", "condition": "Good" }
          ] },
        { "name": "CABLES",
          "items": [
            { "name": "XLR 25ft", "inventory_counts": { "Summer 2024": 30 },
              "serial_number_frequency": "n/a" },
            { "name": "   ", "inventory_counts": { "Fall 2023": 1 } }
          ] }
    ]
}"#;

#[tokio::test]
async fn import_creates_rows_and_collects_errors() {
    let svc = test_service().await;
    let doc: InventoryDocument = serde_json::from_str(DOC).unwrap();

    let mut seen = 0;
    let stats = svc.import_inventory(&doc, |_| seen += 1).await.unwrap();

    assert_eq!(seen, 4);
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.items, 3);
    assert_eq!(stats.historical_counts, 4);
    assert_eq!(stats.terms, 3);
    assert_eq!(stats.skipped_periods, vec!["Comments".to_string()]);
    assert_eq!(
        stats.skipped_counts,
        vec![r#"Beta 87 / Spring 2024: "N/A""#.to_string()]
    );
    assert_eq!(stats.errors.len(), 1);

    let beta = svc.list_items(None).await.unwrap();
    let beta = beta.iter().find(|i| i.name == "Beta 87").unwrap();
    assert_eq!(beta.location.as_deref(), Some("Cage B"));
}

#[tokio::test]
async fn reimport_updates_in_place() {
    let svc = test_service().await;
    let doc: InventoryDocument = serde_json::from_str(DOC).unwrap();
    svc.import_inventory(&doc, |_| {}).await.unwrap();
    let again = svc.import_inventory(&doc, |_| {}).await.unwrap();

    assert_eq!(again.categories, 0);
    assert_eq!(again.items, 0);
    assert_eq!(svc.list_items(None).await.unwrap().len(), 3);
    assert_eq!(svc.list_historical_counts(None).await.unwrap().len(), 4);
}

#[tokio::test]
async fn imported_history_drives_reports() {
    let svc = test_service().await;
    let doc: InventoryDocument = serde_json::from_str(DOC).unwrap();
    svc.import_inventory(&doc, |_| {}).await.unwrap();

    let sm58 = svc.list_items(None).await.unwrap();
    let sm58 = sm58.iter().find(|i| i.name == "SM58").unwrap();
    let resolved = svc.resolve_item_count(&sm58.id).await.unwrap();
    assert_eq!(resolved.latest_quantity(), 7);
    assert_eq!(resolved.previous_quantity(), 10);

    let snapshot = svc.load_snapshot().await.unwrap();
    let trends = report::trends(&snapshot.view(), report::DEFAULT_TREND_LIMIT);
    assert_eq!(trends.decreases.len(), 1);
    assert_eq!(trends.decreases[0].change, -3);

    let today = chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
    let dash = report::dashboard(&snapshot.view(), &ItemFilter::default(), today);
    assert_eq!(dash.last_updated_term.as_deref(), Some("SUMMER 2024"));
    assert_eq!(dash.total_items, 3);

    // Only XLR was counted in SUMMER 2024.
    let stale = report::stale_items(&snapshot.view());
    assert_eq!(stale.len(), 2);
}
