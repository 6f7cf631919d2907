//! Admin console flows against the shared gateway.

#![allow(clippy::unwrap_used)]

use queens_beauty_admin::{AdminError, CreateOutcome, PAGE_SIZE, is_auth_failure};
use queens_beauty_core::{CatalogGateway, GatewayError, ImageUpload, ProductId};
use queens_beauty_integration_tests::{admin, form, seeded_gateway, store};

#[tokio::test]
async fn test_duplicate_insert_opens_editor() {
    let gateway = seeded_gateway(&[("Shea Butter", 800)]);
    let mut console = admin(&gateway).await;
    let mut original = form("Rose Oil", "Cold pressed", "450");
    original.image = "https://cdn.test/rose.jpg".to_string();
    let CreateOutcome::Created(created) = console.create(&original, None).await.unwrap() else {
        panic!("expected a new product");
    };

    let mut again = form("  rose oil", "COLD PRESSED ", "450.00");
    again.image = "https://cdn.test/rose.jpg".to_string();
    let outcome = console.create(&again, None).await.unwrap();

    let CreateOutcome::Duplicate(existing) = outcome else {
        panic!("expected the existing product");
    };
    assert_eq!(existing.id, created.id);
    assert_eq!(gateway.products().len(), 2);
    let editing = console.editing().unwrap();
    assert_eq!(editing.product_id, created.id);
    assert_eq!(editing.form.price, "450");
    assert_eq!(
        console.notice(),
        Some("This product already exists! Edit it below.")
    );
}

#[tokio::test]
async fn test_products_without_images_are_never_duplicates() {
    let gateway = seeded_gateway(&[("Rose Oil", 450)]);
    let mut console = admin(&gateway).await;

    let outcome = console
        .create(&form("Rose Oil", "Rose Oil description", "450"), None)
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Created(_)));
    assert_eq!(gateway.products().len(), 2);
}

#[tokio::test]
async fn test_different_price_is_not_a_duplicate() {
    let gateway = seeded_gateway(&[("Rose Oil", 450)]);
    let mut console = admin(&gateway).await;

    let outcome = console
        .create(&form("Rose Oil", "Rose Oil description", "500"), None)
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Created(_)));
    assert_eq!(gateway.products().len(), 2);
}

#[tokio::test]
async fn test_duplicate_by_attached_file_name_skips_upload() {
    let gateway = seeded_gateway(&[]);
    let mut console = admin(&gateway).await;
    let mut typed = form("Rose Oil", "Cold pressed", "450");
    typed.image = "https://cdn.test/products/rose.jpg".to_string();
    console.create(&typed, None).await.unwrap();

    let upload = ImageUpload {
        file_name: "rose.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xff, 0xd8],
    };
    let outcome = console
        .create(&form("Rose Oil", "Cold pressed", "450"), Some(upload))
        .await
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::Duplicate(_)));
    assert!(gateway.uploads().is_empty());
    assert_eq!(gateway.products().len(), 1);
}

#[tokio::test]
async fn test_paging_and_search() {
    let names: Vec<String> = (1..=45).map(|i| format!("Product {i}")).collect();
    let rows: Vec<(&str, u32)> = names.iter().map(|n| (n.as_str(), 100)).collect();
    let gateway = seeded_gateway(&rows);
    let mut console = admin(&gateway).await;

    assert_eq!(console.total_pages(), 3);
    assert_eq!(console.visible().len(), PAGE_SIZE);
    console.next_page();
    console.next_page();
    console.next_page();
    assert_eq!(console.page(), 3);
    assert_eq!(console.visible().len(), 5);

    console.previous_page();
    console.previous_page();
    console.set_query("product 4");
    // "Product 4" and "Product 40".."Product 45"
    assert_eq!(console.filtered().len(), 7);
    assert_eq!(console.total_pages(), 1);
    assert_eq!(console.visible().len(), 7);
}

#[tokio::test]
async fn test_deleting_last_item_on_page_steps_back() {
    let names: Vec<String> = (1..=21).map(|i| format!("Product {i}")).collect();
    let rows: Vec<(&str, u32)> = names.iter().map(|n| (n.as_str(), 100)).collect();
    let gateway = seeded_gateway(&rows);
    let mut console = admin(&gateway).await;

    console.next_page();
    assert_eq!(console.page(), 2);
    console.delete(ProductId::new(21)).await.unwrap();

    assert_eq!(console.page(), 1);
    assert_eq!(console.total_pages(), 1);
    assert_eq!(console.visible().len(), PAGE_SIZE);
}

#[tokio::test]
async fn test_rejected_credentials() {
    let gateway = seeded_gateway(&[("Rose Oil", 450)]);
    let mut console = admin(&gateway).await;
    let catalog = store(&gateway).await;

    gateway.fail_next(GatewayError::Unauthorized("JWT expired".to_string()));
    let err = console.delete(ProductId::new(1)).await.unwrap_err();

    assert!(is_auth_failure(&err));
    assert!(matches!(err, AdminError::Gateway { .. }));
    assert_eq!(
        console.notice(),
        Some("You are not signed in or your session has expired.")
    );
    assert_eq!(gateway.list_products().await.unwrap().len(), 1);
    assert_eq!(catalog.snapshot().len(), 1);
}

#[tokio::test]
async fn test_failed_update_keeps_editor_open() {
    let gateway = seeded_gateway(&[("Rose Oil", 450)]);
    let mut console = admin(&gateway).await;
    console.open_editor(ProductId::new(1)).unwrap();

    gateway.fail_next(GatewayError::Transport("connection reset".to_string()));
    let err = console
        .update(ProductId::new(1), &form("Rose Oil", "New", "450"), None)
        .await
        .unwrap_err();

    assert_eq!(err.notice(), "Failed to update product");
    assert!(console.editing().is_some());
    assert_eq!(gateway.products().first().unwrap().description, "Rose Oil description");
}

#[tokio::test]
async fn test_attached_file_replaces_typed_url_in_duplicate_check() {
    let gateway = seeded_gateway(&[]);
    let mut console = admin(&gateway).await;
    let mut typed = form("Rose Oil", "Cold pressed", "450");
    typed.image = "https://cdn.test/products/rose.jpg".to_string();
    console.create(&typed, None).await.unwrap();

    let upload = ImageUpload {
        file_name: "rose-v2.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50],
    };
    let outcome = console.create(&typed, Some(upload)).await.unwrap();

    assert!(matches!(outcome, CreateOutcome::Created(_)));
    assert_eq!(gateway.uploads().len(), 1);
    assert_eq!(gateway.products().len(), 2);
}
