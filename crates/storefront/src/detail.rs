//! Product detail view and quantity validation.
//!
//! Quantity input is unconstrained while typing; validation happens once,
//! when the shopper asks to place the order. A successful validation hands
//! `{product_id, quantity}` plus the already-loaded snapshot to the
//! checkout entry point.

use thiserror::Error;
use tracing::debug;

use eshop_client::{ApiError, EshopApi};
use eshop_client::types::Product;
use eshop_core::ProductId;

use crate::checkout::CheckoutHandoff;

/// Quantity rejected at the detail page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Outside `1..=available`.
    #[error("Please enter a quantity between 1 and {available}")]
    OutOfRange {
        /// Stock at validation time.
        available: u32,
    },
    /// No product loaded to validate against.
    #[error("Product details not found.")]
    NoProduct,
}

/// Validate a requested quantity against available stock.
///
/// The requested value is whatever the user typed, so it is signed; the
/// validated result is the usable `u32`.
///
/// # Errors
///
/// Fails when `quantity < 1` or `quantity > available`.
pub fn validate_quantity(quantity: i64, available: u32) -> Result<u32, QuantityError> {
    if quantity < 1 || quantity > i64::from(available) {
        return Err(QuantityError::OutOfRange { available });
    }
    // Bounds were just checked against a u32.
    u32::try_from(quantity).map_err(|_| QuantityError::OutOfRange { available })
}

/// Product detail view state.
#[derive(Debug, Default)]
pub struct ProductDetail {
    product: Option<Product>,
}

impl ProductDetail {
    /// Create an empty, unloaded view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the view stays unloaded.
    pub async fn load<A: EshopApi>(
        &mut self,
        api: &A,
        id: ProductId,
    ) -> Result<&Product, ApiError> {
        let product = api.get_product(id).await?;
        debug!(%id, name = %product.name, "product loaded");
        Ok(self.product.insert(product))
    }

    /// The loaded snapshot, if any.
    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    /// Validate the requested quantity and hand off to checkout.
    ///
    /// # Errors
    ///
    /// Fails when no product is loaded or the quantity is out of range; no
    /// draft is created in either case.
    pub fn begin_checkout(&self, quantity: i64) -> Result<CheckoutHandoff, QuantityError> {
        let product = self.product.as_ref().ok_or(QuantityError::NoProduct)?;
        let quantity = validate_quantity(quantity, product.available_items)?;
        Ok(CheckoutHandoff::new(
            product.id,
            quantity,
            Some(product.clone()),
        ))
    }
}
