// Catalog: product logic shared by the web API and the CLI.
//
// Nothing here touches the store: callers load the product list from the
// Database and pass slices in, or hand over a draft to turn into a stored
// document.

pub mod draft;
pub mod filter;
pub mod search;

pub use filter::{categories, PriceRange, ProductFilter, SortOrder, TagFilter};
pub use search::search;

use crate::db::models::Product;

/// Products flagged for the home page carousel.
pub fn home_products(products: &[Product]) -> Vec<Product> {
    products.iter().filter(|p| p.include_home).cloned().collect()
}

/// Look up a product by exact id.
pub fn find_by_id<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}
