use super::*;

async fn memory_storage() -> Storage {
    Storage::new("sqlite::memory:").await.expect("db")
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = memory_storage().await;
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn fresh_database_has_no_items() {
    let storage = memory_storage().await;
    let items = storage.fetch_items().await.expect("fetch");
    assert!(items.is_empty());
}

#[tokio::test]
async fn inserts_and_fetches_items_in_id_order() {
    let storage = memory_storage().await;
    let banana = storage.insert_item("Banana", 5).await.expect("banana");
    let apple = storage.insert_item("Apple", 10).await.expect("apple");
    assert!(apple.0 > banana.0);

    let items = storage.fetch_items().await.expect("fetch");
    assert_eq!(
        items,
        vec![
            Item {
                id: banana,
                name: "Banana".into(),
                quantity: 5,
            },
            Item {
                id: apple,
                name: "Apple".into(),
                quantity: 10,
            },
        ]
    );
}

#[tokio::test]
async fn stores_negative_and_zero_quantities() {
    let storage = memory_storage().await;
    storage.insert_item("Debt", -3).await.expect("negative");
    storage.insert_item("Empty", 0).await.expect("zero");

    let quantities: Vec<i64> = storage
        .fetch_items()
        .await
        .expect("fetch")
        .into_iter()
        .map(|item| item.quantity)
        .collect();
    assert_eq!(quantities, vec![-3, 0]);
}

#[tokio::test]
async fn updates_existing_item_in_place() {
    let storage = memory_storage().await;
    let id = storage.insert_item("Bolts", 100).await.expect("insert");

    storage
        .update_item(id, "Hex bolts", 80)
        .await
        .expect("update");

    let items = storage.fetch_items().await.expect("fetch");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].name, "Hex bolts");
    assert_eq!(items[0].quantity, 80);
}

#[tokio::test]
async fn update_of_missing_item_is_not_found() {
    let storage = memory_storage().await;
    let err = storage
        .update_item(ItemId(404), "Ghost", 1)
        .await
        .expect_err("missing id");
    assert!(matches!(err, StoreError::NotFound(ItemId(404))));
}

#[tokio::test]
async fn deletes_only_the_requested_item() {
    let storage = memory_storage().await;
    let keep = storage.insert_item("Nuts", 7).await.expect("keep");
    let drop_id = storage.insert_item("Washers", 3).await.expect("drop");

    storage.delete_item(drop_id).await.expect("delete");

    let items = storage.fetch_items().await.expect("fetch");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, keep);
}

#[tokio::test]
async fn delete_of_missing_item_is_not_found() {
    let storage = memory_storage().await;
    let id = storage.insert_item("Once", 1).await.expect("insert");
    storage.delete_item(id).await.expect("first delete");

    let err = storage.delete_item(id).await.expect_err("second delete");
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let storage = memory_storage().await;
    let first = storage.insert_item("First", 1).await.expect("first");
    storage.delete_item(first).await.expect("delete");
    let second = storage.insert_item("Second", 2).await.expect("second");
    assert_ne!(first, second);
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("inventory.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage.insert_item("Persisted", 9).await.expect("insert");
    storage.pool().close().await;
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let items = reopened.fetch_items().await.expect("fetch");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Persisted");
}

#[test]
fn memory_url_has_no_filesystem_path() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert!(sqlite_path("postgres://localhost/db").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/inventory.db?mode=rwc"),
        Some(PathBuf::from("./data/inventory.db"))
    );
}
