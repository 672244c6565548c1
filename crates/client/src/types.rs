//! Wire types for the E-Shop REST API.
//!
//! Field names follow the remote service's camelCase JSON. These types are
//! snapshots of server-owned state; nothing here is mutated locally except
//! through an explicit write endpoint.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use eshop_core::{AddressId, Email, ProductId};

// =============================================================================
// Catalog
// =============================================================================

/// A product in the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Category the product belongs to.
    pub category: String,
    /// Unit price. The API sends prices as JSON numbers.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: String,
    /// Units currently in stock.
    pub available_items: u32,
    /// Optional product image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the product entered the catalog.
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when creating or replacing a product.
///
/// `PUT /products/:id` takes a full replacement, not a patch, so the same
/// payload type serves both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub manufacturer: String,
    pub available_items: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =============================================================================
// Addresses
// =============================================================================

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Server-assigned address ID.
    pub id: AddressId,
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub contact_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    /// Optional landmark hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    pub zip_code: String,
}

/// Fields submitted when saving a new address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub name: String,
    pub contact_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    pub zip_code: String,
}

// =============================================================================
// Orders
// =============================================================================

/// Payload for `POST /orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub address_id: AddressId,
}

// =============================================================================
// Auth
// =============================================================================

/// Credentials for `POST /auth/signin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    /// The account email, named `username` on the wire.
    pub username: String,
    pub password: String,
}

/// Body of a successful signin response. The token itself arrives in the
/// `x-auth-token` response header, not the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigninResponse {
    /// Role names, most significant first.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Payload for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password: String,
    pub contact_number: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_from_api_shape() {
        let json = r#"{
            "id": 1,
            "name": "Lamp",
            "category": "Furniture",
            "price": 200.0,
            "description": "A lamp",
            "manufacturer": "Acme",
            "availableItems": 3,
            "imageUrl": "https://example.com/lamp.png",
            "createdAt": "2024-03-01T12:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(200, 0));
        assert_eq!(product.available_items, 3);
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://example.com/lamp.png")
        );
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": 2,
            "name": "Chair",
            "category": "Furniture",
            "price": 49.5,
            "availableItems": 10,
            "createdAt": "2024-03-01T12:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_order_request_wire_shape() {
        let order = OrderRequest {
            product_id: ProductId::new(1),
            quantity: 2,
            address_id: AddressId::new(7),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"productId": 1, "quantity": 2, "addressId": 7})
        );
    }

    #[test]
    fn test_new_address_omits_empty_landmark() {
        let addr = NewAddress {
            name: "A".into(),
            contact_number: "555".into(),
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            landmark: None,
            zip_code: "62704".into(),
        };
        let json = serde_json::to_value(&addr).unwrap();
        assert!(json.get("landmark").is_none());
        assert_eq!(json["contactNumber"], "555");
        assert_eq!(json["zipCode"], "62704");
    }

    #[test]
    fn test_signin_response_defaults() {
        let resp: SigninResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.roles.is_empty());
    }
}
