// Data models: Rust structs that map to stored documents and rows.
//
// These are the types that flow through the application. They're separate
// from the database queries so the catalog and web layers can use them
// without depending on rusqlite directly.
//
// Field names on the wire follow the storefront's JSON documents:
// `originalPrice` and `includeHome` are camelCase, the image fields are
// snake_case.

use serde::{Deserialize, Serialize};

/// Merchandising badge shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductTag {
    BestSeller,
    New,
}

impl ProductTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductTag::BestSeller => "best-seller",
            ProductTag::New => "new",
        }
    }
}

impl std::fmt::Display for ProductTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Material / care / warranty copy for the product detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDetails {
    pub material: String,
    pub care: String,
    pub warranty: String,
}

/// A colour variant with its own imagery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductColor {
    pub name: String,
    pub hex: String,
    pub image_main: String,
    pub image_hover: String,
}

/// A product document in the catalog collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(rename = "originalPrice", default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub image_main: String,
    #[serde(default)]
    pub image_hover: String,
    #[serde(default)]
    pub tag: Option<ProductTag>,
    #[serde(rename = "includeHome", default)]
    pub include_home: bool,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: ProductDetails,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
}

impl Product {
    /// True when at least one unit can be ordered.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A submitted contact-form message, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub received_at: String,
}
