// Database trait: backend-agnostic async interface for all DB operations.
//
// Implementors: SqliteDatabase (wraps rusqlite). All methods are async so a
// natively async document store can sit behind the same interface.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::models::{ContactMessage, Product};
use crate::contact::ContactSubmission;

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Products ---

    /// All products in insertion order.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// A single product by id.
    async fn get_product(&self, id: &str) -> Result<Option<Product>>;

    /// Insert a new product. Returns false if the id already exists.
    async fn insert_product(&self, product: &Product) -> Result<bool>;

    /// Merge `patch` into the stored product atomically. Returns the updated
    /// product, or `None` if absent. An invalid patch fails with a `DraftError`.
    async fn update_product(&self, id: &str, patch: Value) -> Result<Option<Product>>;

    /// Delete a product by id. Returns false if absent.
    async fn delete_product(&self, id: &str) -> Result<bool>;

    /// Number of stored products.
    async fn product_count(&self) -> Result<i64>;

    // --- Contact messages ---

    /// Store a contact-form submission and return its id.
    async fn insert_contact_message(&self, submission: &ContactSubmission) -> Result<i64>;

    /// Most recent contact messages, newest first.
    async fn get_recent_contact_messages(&self, limit: u32) -> Result<Vec<ContactMessage>>;
}
