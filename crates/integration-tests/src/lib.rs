//! Test support for the E-Shop client flows.
//!
//! [`FakeApi`] is an in-memory [`EshopApi`] backend. It records every call
//! by name so tests can assert that a validation failure made no network
//! call, and exposes failure toggles to simulate a flaky service.
//!
//! # Usage
//!
//! ```rust
//! use eshop_integration_tests::FakeApi;
//!
//! let api = FakeApi::new().with_product(eshop_integration_tests::product(1, "Lamp", "Furniture", 200, 3));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;

use eshop_client::types::{
    Address, NewAddress, OrderRequest, Product, ProductPayload, SigninRequest, SignupRequest,
};
use eshop_client::{ApiError, EshopApi, SigninOutcome};
use eshop_core::{AddressId, ProductId, Role};

/// Password every fake account accepts.
pub const VALID_PASSWORD: &str = "secret";

/// Build a catalog product with the given price and stock.
#[must_use]
pub fn product(id: i64, name: &str, category: &str, price: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        price: Decimal::new(price, 0),
        description: String::new(),
        manufacturer: String::new(),
        available_items: stock,
        image_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

/// Build a saved address.
#[must_use]
pub fn address(id: i64, city: &str) -> Address {
    Address {
        id: AddressId::new(id),
        name: "Ada".to_string(),
        contact_number: "555".to_string(),
        street: "1 Main St".to_string(),
        city: city.to_string(),
        state: "IL".to_string(),
        landmark: None,
        zip_code: "62704".to_string(),
    }
}

/// In-memory backend standing in for the remote service.
#[derive(Debug, Default)]
pub struct FakeApi {
    products: Mutex<Vec<Product>>,
    categories: Mutex<Vec<String>>,
    addresses: Mutex<Vec<Address>>,
    orders: Mutex<Vec<OrderRequest>>,
    signups: Mutex<Vec<SignupRequest>>,
    /// Role names returned by signin, most significant first.
    roles: Mutex<Vec<String>>,
    /// Every API call, by method name, in order.
    calls: Mutex<Vec<&'static str>>,
    next_address_id: AtomicI64,
    fail_next: Mutex<Option<&'static str>>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_address_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_product(self, product: Product) -> Self {
        {
            let mut products = self.products.lock().unwrap();
            let mut categories = self.categories.lock().unwrap();
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
            products.push(product);
        }
        self
    }

    #[must_use]
    pub fn with_address(self, address: Address) -> Self {
        self.addresses.lock().unwrap().push(address);
        self
    }

    #[must_use]
    pub fn with_roles(self, roles: &[&str]) -> Self {
        *self.roles.lock().unwrap() = roles.iter().map(ToString::to_string).collect();
        self
    }

    /// Make the named method fail once with a 500.
    pub fn fail_next(&self, method: &'static str) {
        *self.fail_next.lock().unwrap() = Some(method);
    }

    /// Overwrite a product's stock, simulating concurrent purchases.
    pub fn set_stock(&self, id: ProductId, stock: u32) {
        let mut products = self.products.lock().unwrap();
        let product = products.iter_mut().find(|p| p.id == id).unwrap();
        product.available_items = stock;
    }

    /// Orders received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().unwrap().clone()
    }

    /// Signups received so far.
    #[must_use]
    pub fn signups(&self) -> Vec<SignupRequest> {
        self.signups.lock().unwrap().clone()
    }

    /// Current product list, as the server sees it.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    /// Every call made so far, by method name.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times the named method was called.
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == method)
            .count()
    }

    fn record(&self, method: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(method);
        let mut fail = self.fail_next.lock().unwrap();
        if *fail == Some(method) {
            *fail = None;
            return Err(ApiError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl EshopApi for FakeApi {
    async fn sign_in(&self, request: &SigninRequest) -> Result<SigninOutcome, ApiError> {
        self.record("sign_in")?;
        if request.password != VALID_PASSWORD {
            return Err(ApiError::InvalidCredentials);
        }
        let roles = self.roles.lock().unwrap();
        let role = roles
            .first()
            .map_or(Role::User, |name| Role::from_role_name(name));
        Ok(SigninOutcome {
            token: SecretString::from(format!("token-for-{}", request.username)),
            role,
        })
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<(), ApiError> {
        self.record("sign_up")?;
        self.signups.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record("list_products")?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.record("get_product")?;
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("product {id}")))
    }

    async fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        self.record("list_categories")?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.record("create_product")?;
        let mut products = self.products.lock().unwrap();
        let id = products.iter().map(|p| p.id.as_i64()).max().unwrap_or(0) + 1;
        let product = Product {
            id: ProductId::new(id),
            name: payload.name.clone(),
            category: payload.category.clone(),
            price: payload.price,
            description: payload.description.clone(),
            manufacturer: payload.manufacturer.clone(),
            available_items: payload.available_items,
            image_url: payload.image_url.clone(),
            created_at: Utc::now(),
        };
        products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        self.record("update_product")?;
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;
        product.name = payload.name.clone();
        product.category = payload.category.clone();
        product.price = payload.price;
        product.description = payload.description.clone();
        product.manufacturer = payload.manufacturer.clone();
        product.available_items = payload.available_items;
        product.image_url = payload.image_url.clone();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.record("delete_product")?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(ApiError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.record("list_addresses")?;
        Ok(self.addresses.lock().unwrap().clone())
    }

    async fn create_address(&self, new_address: &NewAddress) -> Result<Address, ApiError> {
        self.record("create_address")?;
        let id = self.next_address_id.fetch_add(1, Ordering::SeqCst);
        let saved = Address {
            id: AddressId::new(id),
            name: new_address.name.clone(),
            contact_number: new_address.contact_number.clone(),
            street: new_address.street.clone(),
            city: new_address.city.clone(),
            state: new_address.state.clone(),
            landmark: new_address.landmark.clone(),
            zip_code: new_address.zip_code.clone(),
        };
        self.addresses.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<(), ApiError> {
        self.record("place_order")?;
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == order.product_id)
            .ok_or_else(|| ApiError::NotFound(format!("product {}", order.product_id)))?;
        if order.quantity > product.available_items {
            return Err(ApiError::Api {
                status: 400,
                message: "insufficient stock".to_string(),
            });
        }
        product.available_items -= order.quantity;
        drop(products);
        self.orders.lock().unwrap().push(*order);
        Ok(())
    }
}
