// Quick search for the storefront search dialog.
//
// Case-insensitive substring match over title, category, and description.
// Results keep store order and are capped so the dialog stays short.

use crate::db::models::Product;

/// Maximum number of hits returned for one query.
pub const MAX_RESULTS: usize = 8;

/// Find products matching `query`. A blank query matches nothing.
pub fn search(products: &[Product], query: &str) -> Vec<Product> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let q = query.to_lowercase();

    products
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&q)
                || p.category.to_lowercase().contains(&q)
                || p.description.to_lowercase().contains(&q)
        })
        .take(MAX_RESULTS)
        .cloned()
        .collect()
}
