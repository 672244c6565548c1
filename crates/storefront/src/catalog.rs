//! Product catalog view: fetch, filter, sort.
//!
//! The full product set is fetched once on mount and every filter change is
//! recomputed locally from that set - no incremental re-fetch. Refreshes
//! happen only through the named triggers ([`CatalogView::on_mount`],
//! [`CatalogView::on_product_deleted`]); an unmounted view is simply
//! dropped, taking any not-yet-applied load result with it.

use tracing::debug;

use eshop_client::EshopApi;
use eshop_client::types::Product;
use eshop_core::{Notification, NotificationQueue};

use crate::error::Result;

/// Synthetic category sentinel meaning "no category filter".
///
/// Prefixed locally to the server-provided category list; the server never
/// sends it.
pub const ALL_CATEGORIES: &str = "ALL";

/// Sort orders offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Service-defined order, untouched.
    #[default]
    Default,
    /// Price high to low.
    PriceDesc,
    /// Price low to high.
    PriceAsc,
    /// Most recently created first.
    Newest,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "price-desc" => Ok(Self::PriceDesc),
            "price-asc" => Ok(Self::PriceAsc),
            "newest" => Ok(Self::Newest),
            _ => Err(format!(
                "invalid sort order: {s} (expected default, price-desc, price-asc, newest)"
            )),
        }
    }
}

/// Local filter state, applied in fixed order: query, category, sort.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on the product name.
    pub query: String,
    /// Exact category match, unless [`ALL_CATEGORIES`].
    pub category: String,
    /// Sort applied last.
    pub sort_by: SortBy,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort_by: SortBy::Default,
        }
    }
}

/// Apply the filter pipeline to a product set.
///
/// Pure: borrows from the input set and never mutates it. An empty query
/// returns all items unchanged; sorts are stable for ties.
#[must_use]
pub fn apply_filters<'a>(products: &'a [Product], filter: &CatalogFilter) -> Vec<&'a Product> {
    let query = filter.query.to_lowercase();

    let mut visible: Vec<&Product> = products
        .iter()
        .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
        .filter(|p| filter.category == ALL_CATEGORIES || p.category == filter.category)
        .collect();

    match filter.sort_by {
        SortBy::Default => {}
        SortBy::PriceDesc => visible.sort_by(|a, b| b.price.cmp(&a.price)),
        SortBy::PriceAsc => visible.sort_by(|a, b| a.price.cmp(&b.price)),
        SortBy::Newest => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    visible
}

/// In-memory catalog view state.
#[derive(Debug, Default)]
pub struct CatalogView {
    products: Vec<Product>,
    categories: Vec<String>,
    filter: CatalogFilter,
}

impl CatalogView {
    /// Create an empty, unloaded view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount trigger: fetch categories and the full product list.
    ///
    /// The category list is prefixed with the [`ALL_CATEGORIES`] sentinel.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the view keeps whatever it had before, and
    /// the caller decides whether to retry. No retry is automatic.
    pub async fn on_mount<A: EshopApi>(&mut self, api: &A) -> Result<()> {
        let server_categories = api.list_categories().await?;
        let mut categories = Vec::with_capacity(server_categories.len() + 1);
        categories.push(ALL_CATEGORIES.to_string());
        categories.extend(server_categories);

        let products = api.list_products().await?;
        debug!(
            products = products.len(),
            categories = categories.len(),
            "catalog loaded"
        );

        self.categories = categories;
        self.products = products;
        Ok(())
    }

    /// Filter-change trigger: local state only, never a re-fetch.
    pub fn on_filter_changed(&mut self, filter: CatalogFilter) {
        self.filter = filter;
    }

    /// Order-placed trigger: consume the pending one-shot notification, if
    /// any, for display on the next render.
    pub fn on_order_placed(&mut self, notifications: &mut NotificationQueue) -> Option<Notification> {
        notifications.pop()
    }

    /// Product-deleted trigger: the set changed server-side, re-fetch it.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the stale list is kept.
    pub async fn on_product_deleted<A: EshopApi>(&mut self, api: &A) -> Result<()> {
        self.products = api.list_products().await?;
        Ok(())
    }

    /// Products visible under the current filter, recomputed on every call
    /// from the full fetched set.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        apply_filters(&self.products, &self.filter)
    }

    /// Category toggle values, `ALL` first.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The current filter state.
    #[must_use]
    pub const fn filter(&self) -> &CatalogFilter {
        &self.filter
    }
}
