// Admin-side product editing: building new products and merging updates.
//
// Creation fills the same defaults the dashboard relies on (hover image falls
// back to the main image, original price to the price). Updates are a
// top-level merge of the submitted fields into the stored document; the id
// can never be changed through an update.

use serde::Deserialize;
use serde_json::Value;

use crate::db::models::{Product, ProductColor, ProductDetails, ProductTag};

/// Fields that an update is never allowed to touch.
const IMMUTABLE_FIELDS: &[&str] = &["id", "_id"];

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("title and price are required.")]
    MissingRequired,

    #[error("update body must be a JSON object.")]
    NotAnObject,

    #[error("invalid product field: {0}")]
    InvalidField(#[from] serde_json::Error),
}

/// Body of a product creation request. Everything but title and price is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    pub title: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "originalPrice")]
    pub original_price: Option<f64>,
    pub image_main: Option<String>,
    pub image_hover: Option<String>,
    pub tag: Option<ProductTag>,
    #[serde(rename = "includeHome")]
    pub include_home: Option<bool>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub details: Option<ProductDetails>,
    pub colors: Option<Vec<ProductColor>>,
}

impl NewProduct {
    /// Build the stored product under `id`, applying defaults.
    pub fn into_product(self, id: String) -> Result<Product, DraftError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(DraftError::MissingRequired)?;
        let price = self.price.ok_or(DraftError::MissingRequired)?;

        let image_main = self.image_main.unwrap_or_default();
        let image_hover = self
            .image_hover
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| image_main.clone());

        Ok(Product {
            id,
            title,
            price,
            original_price: Some(self.original_price.unwrap_or(price)),
            image_main,
            image_hover,
            tag: self.tag,
            include_home: self.include_home.unwrap_or(false),
            stock: self.stock.unwrap_or(0),
            category: self.category.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            details: self.details.unwrap_or_default(),
            colors: self.colors.unwrap_or_default(),
        })
    }
}

/// New product id: `prod-<unix millis>`, with a numeric suffix on retries.
pub fn new_product_id(attempt: u32) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    if attempt == 0 {
        format!("prod-{millis}")
    } else {
        format!("prod-{millis}-{attempt}")
    }
}

/// Merge `patch` into `product` field by field, ignoring id fields.
///
/// The merged document must still deserialize as a product.
pub fn apply_patch(product: &Product, patch: Value) -> Result<Product, DraftError> {
    let Value::Object(fields) = patch else {
        return Err(DraftError::NotAnObject);
    };

    let mut document = serde_json::to_value(product)?;
    if let Value::Object(ref mut target) = document {
        for (key, value) in fields {
            if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            target.insert(key, value);
        }
    }

    let mut merged: Product = serde_json::from_value(document)?;
    merged.id = product.id.clone();
    Ok(merged)
}
