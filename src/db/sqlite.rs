// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use serde_json::Value;
use tokio::sync::Mutex;

use super::models::{ContactMessage, Product};
use super::traits::Database;
use crate::contact::ContactSubmission;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Fresh in-memory database with the schema applied.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::create_tables(&conn)?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let conn = self.conn.lock().await;
        super::queries::list_products(&conn)
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        let conn = self.conn.lock().await;
        super::queries::get_product(&conn, id)
    }

    async fn insert_product(&self, product: &Product) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::insert_product(&conn, product)
    }

    async fn update_product(&self, id: &str, patch: Value) -> Result<Option<Product>> {
        let mut conn = self.conn.lock().await;
        super::queries::update_product(&mut conn, id, patch)
    }

    async fn delete_product(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::delete_product(&conn, id)
    }

    async fn product_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::product_count(&conn)
    }

    async fn insert_contact_message(&self, submission: &ContactSubmission) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::insert_contact_message(&conn, submission)
    }

    async fn get_recent_contact_messages(&self, limit: u32) -> Result<Vec<ContactMessage>> {
        let conn = self.conn.lock().await;
        super::queries::get_recent_contact_messages(&conn, limit)
    }
}
