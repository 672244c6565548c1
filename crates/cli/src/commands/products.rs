//! Catalog browsing commands.

use eshop_client::types::Product;
use eshop_client::EshopApi;
use eshop_core::ProductId;
use eshop_storefront::catalog::{CatalogFilter, CatalogView, SortBy, ALL_CATEGORIES};

use super::CliError;

/// List products through the catalog view so filtering and sorting behave
/// exactly like the storefront.
#[allow(clippy::print_stdout)]
pub async fn list(
    query: Option<String>,
    category: Option<String>,
    sort: SortBy,
) -> Result<(), CliError> {
    let (api, _) = super::signed_in_client()?;

    let mut catalog = CatalogView::new();
    catalog.on_mount(&api).await?;
    catalog.on_filter_changed(CatalogFilter {
        query: query.unwrap_or_default(),
        category: category.unwrap_or_else(|| ALL_CATEGORIES.to_string()),
        sort_by: sort,
    });

    let products = catalog.visible_products();
    if products.is_empty() {
        println!("No products match");
        return Ok(());
    }
    for product in products {
        print_row(product);
    }
    Ok(())
}

/// Show one product in full.
#[allow(clippy::print_stdout)]
pub async fn show(id: i64) -> Result<(), CliError> {
    let (api, _) = super::signed_in_client()?;
    let product = api.get_product(ProductId::new(id)).await?;

    println!("{} (#{})", product.name, product.id);
    println!("  category:     {}", product.category);
    println!("  price:        {}", product.price);
    println!("  in stock:     {}", product.available_items);
    if !product.manufacturer.is_empty() {
        println!("  manufacturer: {}", product.manufacturer);
    }
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_row(product: &Product) {
    println!(
        "{:>5}  {:<30}  {:<15}  {:>10}  {:>5} in stock",
        product.id.to_string(),
        product.name,
        product.category,
        product.price.to_string(),
        product.available_items
    );
}
