//! Product create/update/delete flows.
//!
//! Form fields are free text, as typed. Validation coerces `price` and
//! `available_items` to numerics at submission time; a field that does not
//! parse blocks the save locally with no network call. Success clears the
//! form and queues a one-shot notification for the catalog view; failure
//! keeps the form contents so the admin can correct and retry.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use eshop_client::types::{Product, ProductPayload};
use eshop_client::{ApiError, EshopApi};
use eshop_core::{Notification, NotificationQueue, ProductId, Role};

/// Errors surfaced by the product editor.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A required field is empty. Nothing was sent.
    #[error("Please fill all required fields!")]
    MissingFields,

    /// A numeric field did not parse. Nothing was sent.
    #[error("{field} must be a valid number")]
    InvalidNumber {
        /// Which field failed to coerce.
        field: &'static str,
    },

    /// The signed-in user is not an admin. The remote service enforces
    /// this too; the local gate just fails fast.
    #[error("this operation requires an admin account")]
    Forbidden,

    /// Remote API call failed; the form contents are kept.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Product form as typed by the admin. All fields are free text.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub manufacturer: String,
    pub available_items: String,
    pub image_url: String,
}

impl ProductForm {
    /// Prefill the form from an existing product, for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            manufacturer: product.manufacturer.clone(),
            available_items: product.available_items.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    /// Validate and coerce the form into a wire payload.
    ///
    /// # Errors
    ///
    /// [`EditorError::MissingFields`] when `name`, `category`, `price`, or
    /// `available_items` is blank; [`EditorError::InvalidNumber`] when a
    /// numeric field does not parse or is negative.
    pub fn validate(&self) -> Result<ProductPayload, EditorError> {
        let name = self.name.trim();
        let category = self.category.trim();
        let price = self.price.trim();
        let available_items = self.available_items.trim();
        if name.is_empty() || category.is_empty() || price.is_empty() || available_items.is_empty()
        {
            return Err(EditorError::MissingFields);
        }

        let price = Decimal::from_str(price)
            .ok()
            .filter(|p| !p.is_sign_negative())
            .ok_or(EditorError::InvalidNumber { field: "price" })?;
        let available_items = available_items.parse::<u32>().map_err(|_| {
            EditorError::InvalidNumber {
                field: "available items",
            }
        })?;

        let image_url = self.image_url.trim();
        Ok(ProductPayload {
            name: name.to_owned(),
            category: category.to_owned(),
            price,
            description: self.description.trim().to_owned(),
            manufacturer: self.manufacturer.trim().to_owned(),
            available_items,
            image_url: if image_url.is_empty() {
                None
            } else {
                Some(image_url.to_owned())
            },
        })
    }
}

/// Category choices for the product form.
///
/// Merges the server-provided set with values the admin typed in this
/// session. A locally added category becomes real on the server only once
/// a product using it is saved.
#[derive(Debug, Clone, Default)]
pub struct CategoryPicker {
    options: Vec<String>,
}

impl CategoryPicker {
    /// Build the picker from the server's category list.
    #[must_use]
    pub const fn from_server(options: Vec<String>) -> Self {
        Self { options }
    }

    /// Add a locally typed category; `false` if it was already present.
    pub fn add_custom(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        if self.options.iter().any(|c| c == &category) {
            return false;
        }
        self.options.push(category);
        true
    }

    /// All selectable categories, server-provided first.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// Admin product editor.
///
/// Holds the form and the role gate. Every mutation validates locally,
/// checks the gate, then calls the API; success clears the form and queues
/// a catalog notification, failure leaves the form untouched.
#[derive(Debug)]
pub struct ProductEditor {
    role: Role,
    pub form: ProductForm,
}

impl ProductEditor {
    /// Create an editor for the signed-in role.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            form: ProductForm::default(),
        }
    }

    /// Create an editor prefilled for modifying an existing product.
    #[must_use]
    pub fn for_product(role: Role, product: &Product) -> Self {
        Self {
            role,
            form: ProductForm::from_product(product),
        }
    }

    fn require_admin(&self) -> Result<(), EditorError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(EditorError::Forbidden)
        }
    }

    /// `POST /products` from the current form.
    ///
    /// # Errors
    ///
    /// Validation, role gate, or API failure; the form is kept on failure.
    pub async fn create_product<A: EshopApi>(
        &mut self,
        api: &A,
        notifications: &mut NotificationQueue,
    ) -> Result<Product, EditorError> {
        self.require_admin()?;
        let payload = self.form.validate()?;

        let product = api.create_product(&payload).await?;
        info!(id = %product.id, name = %product.name, "product created");
        notifications.push(Notification::success(format!(
            "Product {} added successfully",
            product.name
        )));
        self.form = ProductForm::default();
        Ok(product)
    }

    /// `PUT /products/:id` from the current form. Full replacement.
    ///
    /// # Errors
    ///
    /// Validation, role gate, or API failure; the form is kept on failure.
    pub async fn update_product<A: EshopApi>(
        &mut self,
        api: &A,
        id: ProductId,
        notifications: &mut NotificationQueue,
    ) -> Result<Product, EditorError> {
        self.require_admin()?;
        let payload = self.form.validate()?;

        let product = api.update_product(id, &payload).await?;
        info!(%id, name = %product.name, "product updated");
        notifications.push(Notification::success(format!(
            "Product {} modified successfully",
            product.name
        )));
        self.form = ProductForm::default();
        Ok(product)
    }

    /// `DELETE /products/:id`. The caller re-fetches the catalog on success.
    ///
    /// # Errors
    ///
    /// Role gate or API failure.
    pub async fn delete_product<A: EshopApi>(
        &self,
        api: &A,
        id: ProductId,
        name: &str,
        notifications: &mut NotificationQueue,
    ) -> Result<(), EditorError> {
        self.require_admin()?;

        api.delete_product(id).await?;
        info!(%id, name, "product deleted");
        notifications.push(Notification::success(format!(
            "Product {name} deleted successfully"
        )));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::Utc;

    fn filled_form() -> ProductForm {
        ProductForm {
            name: "Desk Lamp".to_string(),
            category: "Furniture".to_string(),
            price: "199.99".to_string(),
            description: "A lamp".to_string(),
            manufacturer: "Acme".to_string(),
            available_items: "12".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_validate_coerces_numeric_fields() {
        let payload = filled_form().validate().unwrap();
        assert_eq!(payload.price, Decimal::new(19999, 2));
        assert_eq!(payload.available_items, 12);
        assert!(payload.image_url.is_none());
    }

    #[test]
    fn test_missing_price_blocks_save() {
        let mut form = filled_form();
        form.price = String::new();
        assert!(matches!(form.validate(), Err(EditorError::MissingFields)));
    }

    #[test]
    fn test_unparseable_price_blocks_save() {
        let mut form = filled_form();
        form.price = "free".to_string();
        assert!(matches!(
            form.validate(),
            Err(EditorError::InvalidNumber { field: "price" })
        ));
    }

    #[test]
    fn test_negative_price_blocks_save() {
        let mut form = filled_form();
        form.price = "-5".to_string();
        assert!(matches!(
            form.validate(),
            Err(EditorError::InvalidNumber { field: "price" })
        ));
    }

    #[test]
    fn test_fractional_stock_blocks_save() {
        let mut form = filled_form();
        form.available_items = "2.5".to_string();
        assert!(matches!(
            form.validate(),
            Err(EditorError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_form_roundtrips_through_product() {
        let product = Product {
            id: ProductId::new(5),
            name: "Chair".to_string(),
            category: "Furniture".to_string(),
            price: Decimal::new(495, 1),
            description: String::new(),
            manufacturer: "Acme".to_string(),
            available_items: 4,
            image_url: Some("https://example.com/chair.png".to_string()),
            created_at: Utc::now(),
        };

        let payload = ProductForm::from_product(&product).validate().unwrap();
        assert_eq!(payload.name, product.name);
        assert_eq!(payload.price, product.price);
        assert_eq!(payload.available_items, product.available_items);
        assert_eq!(payload.image_url, product.image_url);
    }

    #[test]
    fn test_category_picker_merges_without_duplicates() {
        let mut picker =
            CategoryPicker::from_server(vec!["Furniture".to_string(), "Apparel".to_string()]);
        assert!(picker.add_custom("Gadgets"));
        assert!(!picker.add_custom("Furniture"));
        assert_eq!(picker.options(), ["Furniture", "Apparel", "Gadgets"]);
    }

    #[test]
    fn test_non_admin_role_is_rejected() {
        let editor = ProductEditor::new(Role::User);
        assert!(matches!(
            editor.require_admin(),
            Err(EditorError::Forbidden)
        ));
    }
}
