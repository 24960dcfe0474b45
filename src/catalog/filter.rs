// Storefront filters: category, tag, price band, stock, and price sort.
//
// The product list is small enough that all filtering happens in memory after
// a single load from the store. Filters compose with AND; an all-default
// ProductFilter returns the catalog unchanged and in store order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::models::{Product, ProductTag};

/// Category value the storefront uses for "no category filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
}

/// Which merchandising tag a product must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagFilter {
    #[default]
    All,
    New,
    BestSeller,
}

impl TagFilter {
    fn matches(&self, tag: Option<ProductTag>) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::New => tag == Some(ProductTag::New),
            TagFilter::BestSeller => tag == Some(ProductTag::BestSeller),
        }
    }
}

impl FromStr for TagFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TagFilter::All),
            "new" => Ok(TagFilter::New),
            "best-seller" => Ok(TagFilter::BestSeller),
            _ => Err(ParseFilterError {
                kind: "tag",
                value: s.to_string(),
            }),
        }
    }
}

/// Price bands offered by the storefront. Bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under-75")]
    Under75,
    #[serde(rename = "75-125")]
    From75To125,
    #[serde(rename = "over-125")]
    Over125,
}

impl PriceRange {
    /// Inclusive (min, max) bounds for the band.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            PriceRange::All => (0.0, f64::INFINITY),
            PriceRange::Under75 => (0.0, 74.99),
            PriceRange::From75To125 => (75.0, 124.99),
            PriceRange::Over125 => (125.0, f64::INFINITY),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::All => "All",
            PriceRange::Under75 => "Under $75",
            PriceRange::From75To125 => "$75 – $125",
            PriceRange::Over125 => "Over $125",
        }
    }

    fn contains(&self, price: f64) -> bool {
        let (min, max) = self.bounds();
        price >= min && price <= max
    }
}

impl FromStr for PriceRange {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriceRange::All),
            "under-75" => Ok(PriceRange::Under75),
            "75-125" => Ok(PriceRange::From75To125),
            "over-125" => Ok(PriceRange::Over125),
            _ => Err(ParseFilterError {
                kind: "price range",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Store (insertion) order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortOrder {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SortOrder::Default),
            "price-asc" => Ok(SortOrder::PriceAsc),
            "price-desc" => Ok(SortOrder::PriceDesc),
            _ => Err(ParseFilterError {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

/// A full set of storefront filter selections.
///
/// Deserializes from a query string such as
/// `?category=Hoodies&tag=new&price=75-125&in_stock=true&sort=price-asc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Exact category; `None` or "All" means any.
    pub category: Option<String>,
    pub tag: TagFilter,
    pub price: PriceRange,
    #[serde(rename = "in_stock")]
    pub in_stock_only: bool,
    pub sort: SortOrder,
}

impl ProductFilter {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Whether a single product passes every filter (sort is ignored).
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category() {
            if product.category != category {
                return false;
            }
        }
        if !self.tag.matches(product.tag) {
            return false;
        }
        if !self.price.contains(product.price) {
            return false;
        }
        if self.in_stock_only && !product.in_stock() {
            return false;
        }
        true
    }

    /// Filter then sort. Sorting is stable, so equal prices keep store order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut result: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Default => {}
            SortOrder::PriceAsc => result.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceDesc => result.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
        result
    }

    /// True when any selection differs from the defaults.
    pub fn is_active(&self) -> bool {
        self.category().is_some()
            || self.tag != TagFilter::All
            || self.price != PriceRange::All
            || self.in_stock_only
            || self.sort != SortOrder::Default
    }
}

/// "All" followed by each distinct non-empty category, in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut result = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        if !product.category.is_empty() && !result.contains(&product.category) {
            result.push(product.category.clone());
        }
    }
    result
}
