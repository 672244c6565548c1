//! End-to-end tests for the three-step checkout flow against the in-memory
//! backend.

use eshop_core::{AddressId, NotificationQueue, ProductId};
use eshop_integration_tests::{address, product, FakeApi};
use eshop_storefront::checkout::{
    AddressForm, Checkout, CheckoutError, CheckoutStep, ORDER_PLACED_MESSAGE,
};
use eshop_storefront::detail::ProductDetail;

fn lamp_api() -> FakeApi {
    FakeApi::new()
        .with_product(product(1, "Desk Lamp", "Furniture", 200, 3))
        .with_address(address(7, "Springfield"))
}

async fn checkout_at_confirm(api: &FakeApi) -> Checkout {
    let mut detail = ProductDetail::new();
    detail.load(api, ProductId::new(1)).await.unwrap();
    let handoff = detail.begin_checkout(2).unwrap();

    let mut checkout = Checkout::new(handoff).unwrap();
    checkout.load_item(api).await.unwrap();
    checkout.advance().unwrap();
    checkout.load_addresses(api).await.unwrap();
    checkout.select_address(AddressId::new(7)).unwrap();
    checkout.advance().unwrap();
    assert_eq!(checkout.step(), CheckoutStep::Confirm);
    checkout
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_full_checkout_places_one_order() {
    let api = lamp_api();
    let mut checkout = checkout_at_confirm(&api).await;
    let mut notifications = NotificationQueue::new();

    checkout.submit_order(&api, &mut notifications).await.unwrap();

    let orders = api.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].product_id, ProductId::new(1));
    assert_eq!(orders[0].quantity, 2);
    assert_eq!(orders[0].address_id, AddressId::new(7));

    assert_eq!(checkout.step(), CheckoutStep::Submitted);
    assert!(checkout.draft().is_none());

    // The one-shot notification for the catalog view.
    let note = notifications.pop().unwrap();
    assert_eq!(note.message, ORDER_PLACED_MESSAGE);
    assert!(notifications.pop().is_none());
}

#[tokio::test]
async fn test_order_request_wire_shape() {
    let api = lamp_api();
    let mut checkout = checkout_at_confirm(&api).await;
    let mut notifications = NotificationQueue::new();
    checkout.submit_order(&api, &mut notifications).await.unwrap();

    let json = serde_json::to_value(api.orders()[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"productId": 1, "quantity": 2, "addressId": 7})
    );
}

// ============================================================================
// Address step gating
// ============================================================================

#[tokio::test]
async fn test_cannot_reach_confirm_without_address() {
    let api = lamp_api();
    let mut detail = ProductDetail::new();
    detail.load(&api, ProductId::new(1)).await.unwrap();
    let mut checkout = Checkout::new(detail.begin_checkout(1).unwrap()).unwrap();
    checkout.advance().unwrap();
    checkout.load_addresses(&api).await.unwrap();

    let err = checkout.advance().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Please select an existing address or save a new one."
    );
    assert_eq!(checkout.step(), CheckoutStep::Address);
}

#[tokio::test]
async fn test_create_address_with_missing_city_makes_no_call() {
    let api = lamp_api();
    let mut detail = ProductDetail::new();
    detail.load(&api, ProductId::new(1)).await.unwrap();
    let mut checkout = Checkout::new(detail.begin_checkout(1).unwrap()).unwrap();
    checkout.advance().unwrap();

    let form = AddressForm {
        name: "Ada".to_string(),
        contact_number: "555".to_string(),
        street: "1 Main St".to_string(),
        city: String::new(),
        state: "IL".to_string(),
        landmark: String::new(),
        zip_code: "62704".to_string(),
    };

    let before = api.call_count("create_address");
    let err = checkout.create_address(&api, &form).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(_)));
    assert_eq!(err.to_string(), "Please fill all required fields!");
    assert_eq!(api.call_count("create_address"), before);
}

#[tokio::test]
async fn test_load_addresses_is_idempotent() {
    let api = lamp_api();
    let mut detail = ProductDetail::new();
    detail.load(&api, ProductId::new(1)).await.unwrap();
    let mut checkout = Checkout::new(detail.begin_checkout(1).unwrap()).unwrap();
    checkout.advance().unwrap();

    checkout.load_addresses(&api).await.unwrap();
    let first = checkout.addresses().to_vec();
    checkout.load_addresses(&api).await.unwrap();
    assert_eq!(checkout.addresses(), first);
}

#[tokio::test]
async fn test_saved_address_is_auto_selected() {
    let api = lamp_api();
    let mut detail = ProductDetail::new();
    detail.load(&api, ProductId::new(1)).await.unwrap();
    let mut checkout = Checkout::new(detail.begin_checkout(1).unwrap()).unwrap();
    checkout.advance().unwrap();
    checkout.load_addresses(&api).await.unwrap();

    let form = AddressForm {
        name: "Ada".to_string(),
        contact_number: "555".to_string(),
        street: "2 Oak Ave".to_string(),
        city: "Shelbyville".to_string(),
        state: "IL".to_string(),
        landmark: String::new(),
        zip_code: "62565".to_string(),
    };
    let id = checkout.create_address(&api, &form).await.unwrap();

    // Saved via the server, appended to the list, selected.
    assert!(checkout.addresses().iter().any(|a| a.id == id));
    assert_eq!(checkout.selected_address().map(|a| a.id), Some(id));
    assert_eq!(checkout.advance().unwrap(), CheckoutStep::Confirm);
}

// ============================================================================
// Submission guards
// ============================================================================

#[tokio::test]
async fn test_stock_revalidated_at_submission() {
    let api = lamp_api();
    let mut checkout = checkout_at_confirm(&api).await;

    // Stock drops to 1 while the shopper sits on the confirm step.
    api.set_stock(ProductId::new(1), 1);

    let mut notifications = NotificationQueue::new();
    let err = checkout.submit_order(&api, &mut notifications).await.unwrap_err();
    assert!(matches!(err, CheckoutError::OutOfStock { available: 1 }));

    // Nothing was ordered, the flow stays at confirm, retry is possible.
    assert!(api.orders().is_empty());
    assert_eq!(checkout.step(), CheckoutStep::Confirm);
    assert!(notifications.pop().is_none());

    api.set_stock(ProductId::new(1), 5);
    checkout.submit_order(&api, &mut notifications).await.unwrap();
    assert_eq!(api.orders().len(), 1);
}

#[tokio::test]
async fn test_failed_submission_keeps_flow_retryable() {
    let api = lamp_api();
    let mut checkout = checkout_at_confirm(&api).await;
    let mut notifications = NotificationQueue::new();

    api.fail_next("place_order");
    let err = checkout.submit_order(&api, &mut notifications).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Api(_)));
    assert_eq!(checkout.step(), CheckoutStep::Confirm);
    assert!(checkout.draft().is_some());

    // The shopper retries; no automatic retry happened meanwhile.
    assert_eq!(api.call_count("place_order"), 1);
    checkout.submit_order(&api, &mut notifications).await.unwrap();
    assert_eq!(api.orders().len(), 1);
}

#[tokio::test]
async fn test_abandoned_checkout_drops_inflight_result() {
    let api = lamp_api();
    let mut checkout = checkout_at_confirm(&api).await;

    // Simulate leaving the flow while a request is outstanding.
    let ticket = checkout.begin_request().unwrap();
    checkout.abandon();

    let mut notifications = NotificationQueue::new();
    let result = checkout.apply_order_result(ticket, Ok(()), &mut notifications);
    assert!(matches!(result, Err(CheckoutError::Stale)));
    assert!(notifications.pop().is_none());
}

#[tokio::test]
async fn test_submit_requires_confirm_step() {
    let api = lamp_api();
    let mut detail = ProductDetail::new();
    detail.load(&api, ProductId::new(1)).await.unwrap();
    let mut checkout = Checkout::new(detail.begin_checkout(1).unwrap()).unwrap();

    let mut notifications = NotificationQueue::new();
    let err = checkout.submit_order(&api, &mut notifications).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::WrongStep(CheckoutStep::Items)
    ));
    assert!(api.orders().is_empty());
}

// ============================================================================
// Quantity validation at the entry point
// ============================================================================

#[tokio::test]
async fn test_quantity_above_stock_never_enters_checkout() {
    let api = lamp_api();
    let mut detail = ProductDetail::new();
    detail.load(&api, ProductId::new(1)).await.unwrap();

    // Stock is 3.
    assert!(detail.begin_checkout(4).is_err());
    assert!(detail.begin_checkout(0).is_err());
    assert!(detail.begin_checkout(3).is_ok());
}
