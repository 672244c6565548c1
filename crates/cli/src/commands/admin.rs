//! Admin product management commands.
//!
//! Every command checks the cached session's role before calling the API;
//! the remote service enforces authorization again on its side.

use eshop_admin::{ProductEditor, ProductForm};
use eshop_client::EshopApi;
use eshop_core::{NotificationQueue, ProductId};

use super::CliError;

/// Raw form values as passed on the command line. Numeric fields stay
/// free text until the editor coerces them.
pub struct FormArgs {
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub description: String,
    pub manufacturer: String,
    pub image_url: Option<String>,
}

impl FormArgs {
    fn into_form(self) -> ProductForm {
        ProductForm {
            name: self.name,
            category: self.category,
            price: self.price,
            available_items: self.stock,
            description: self.description,
            manufacturer: self.manufacturer,
            image_url: self.image_url.unwrap_or_default(),
        }
    }
}

/// Create a product from the given form values.
#[allow(clippy::print_stdout)]
pub async fn create(args: FormArgs) -> Result<(), CliError> {
    let (api, session) = super::signed_in_client()?;

    let mut editor = ProductEditor::new(session.role);
    editor.form = args.into_form();

    let mut notifications = NotificationQueue::new();
    let product = editor.create_product(&api, &mut notifications).await?;
    if let Some(note) = notifications.pop() {
        println!("{}", note.message);
    }
    println!("Created product #{}", product.id);
    Ok(())
}

/// Replace a product with the given form values.
#[allow(clippy::print_stdout)]
pub async fn update(id: i64, args: FormArgs) -> Result<(), CliError> {
    let (api, session) = super::signed_in_client()?;

    let mut editor = ProductEditor::new(session.role);
    editor.form = args.into_form();

    let mut notifications = NotificationQueue::new();
    editor
        .update_product(&api, ProductId::new(id), &mut notifications)
        .await?;
    if let Some(note) = notifications.pop() {
        println!("{}", note.message);
    }
    Ok(())
}

/// Delete a product.
#[allow(clippy::print_stdout)]
pub async fn delete(id: i64) -> Result<(), CliError> {
    let (api, session) = super::signed_in_client()?;
    let id = ProductId::new(id);

    // Fetch first so the confirmation names the product.
    let product = api.get_product(id).await?;

    let editor = ProductEditor::new(session.role);
    let mut notifications = NotificationQueue::new();
    editor
        .delete_product(&api, id, &product.name, &mut notifications)
        .await?;
    if let Some(note) = notifications.pop() {
        println!("{}", note.message);
    }
    Ok(())
}
