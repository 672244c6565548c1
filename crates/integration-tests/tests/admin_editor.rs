//! Admin product editor tests: validation, role gate, notifications.

use eshop_admin::{EditorError, ProductEditor, ProductForm};
use eshop_core::{NotificationQueue, ProductId, Role, Severity};
use eshop_integration_tests::{product, FakeApi};

fn filled_form() -> ProductForm {
    ProductForm {
        name: "Desk Lamp".to_string(),
        category: "Furniture".to_string(),
        price: "199.99".to_string(),
        description: String::new(),
        manufacturer: "Acme".to_string(),
        available_items: "12".to_string(),
        image_url: String::new(),
    }
}

#[tokio::test]
async fn test_create_clears_form_and_notifies() {
    let api = FakeApi::new();
    let mut editor = ProductEditor::new(Role::Admin);
    editor.form = filled_form();

    let mut notifications = NotificationQueue::new();
    let created = editor.create_product(&api, &mut notifications).await.unwrap();

    assert_eq!(created.name, "Desk Lamp");
    assert_eq!(api.products().len(), 1);
    assert!(editor.form.name.is_empty());

    let note = notifications.pop().unwrap();
    assert_eq!(note.severity, Severity::Success);
    assert_eq!(note.message, "Product Desk Lamp added successfully");
}

#[tokio::test]
async fn test_missing_price_makes_no_call_and_keeps_form() {
    let api = FakeApi::new();
    let mut editor = ProductEditor::new(Role::Admin);
    editor.form = filled_form();
    editor.form.price = String::new();

    let mut notifications = NotificationQueue::new();
    let err = editor.create_product(&api, &mut notifications).await.unwrap_err();

    assert!(matches!(err, EditorError::MissingFields));
    assert_eq!(err.to_string(), "Please fill all required fields!");
    assert_eq!(api.call_count("create_product"), 0);
    assert_eq!(editor.form.name, "Desk Lamp");
}

#[tokio::test]
async fn test_unparseable_stock_makes_no_call() {
    let api = FakeApi::new();
    let mut editor = ProductEditor::new(Role::Admin);
    editor.form = filled_form();
    editor.form.available_items = "many".to_string();

    let mut notifications = NotificationQueue::new();
    let err = editor.create_product(&api, &mut notifications).await.unwrap_err();

    assert!(matches!(err, EditorError::InvalidNumber { .. }));
    assert_eq!(api.call_count("create_product"), 0);
}

#[tokio::test]
async fn test_non_admin_is_rejected_before_any_call() {
    let api = FakeApi::new();
    let mut editor = ProductEditor::new(Role::User);
    editor.form = filled_form();

    let mut notifications = NotificationQueue::new();
    let err = editor.create_product(&api, &mut notifications).await.unwrap_err();

    assert!(matches!(err, EditorError::Forbidden));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_update_replaces_whole_product() {
    let api = FakeApi::new().with_product(product(5, "Chair", "Furniture", 350, 4));
    let mut editor = ProductEditor::for_product(
        Role::Admin,
        &api.products()[0],
    );
    editor.form.price = "299".to_string();
    editor.form.available_items = "2".to_string();

    let mut notifications = NotificationQueue::new();
    let updated = editor
        .update_product(&api, ProductId::new(5), &mut notifications)
        .await
        .unwrap();

    assert_eq!(updated.price.to_string(), "299");
    assert_eq!(updated.available_items, 2);
    assert_eq!(
        notifications.pop().unwrap().message,
        "Product Chair modified successfully"
    );
}

#[tokio::test]
async fn test_failed_update_keeps_form() {
    let api = FakeApi::new().with_product(product(5, "Chair", "Furniture", 350, 4));
    let mut editor = ProductEditor::new(Role::Admin);
    editor.form = filled_form();

    api.fail_next("update_product");
    let mut notifications = NotificationQueue::new();
    let err = editor
        .update_product(&api, ProductId::new(5), &mut notifications)
        .await
        .unwrap_err();

    assert!(matches!(err, EditorError::Api(_)));
    assert_eq!(editor.form.name, "Desk Lamp");
    assert!(notifications.pop().is_none());
}

#[tokio::test]
async fn test_delete_removes_and_notifies() {
    let api = FakeApi::new().with_product(product(5, "Chair", "Furniture", 350, 4));
    let editor = ProductEditor::new(Role::Admin);

    let mut notifications = NotificationQueue::new();
    editor
        .delete_product(&api, ProductId::new(5), "Chair", &mut notifications)
        .await
        .unwrap();

    assert!(api.products().is_empty());
    assert_eq!(
        notifications.pop().unwrap().message,
        "Product Chair deleted successfully"
    );
}
