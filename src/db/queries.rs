// Database queries: CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::models::{ContactMessage, Product};
use crate::catalog::draft::apply_patch;
use crate::contact::ContactSubmission;

// --- Products ---

/// Load every product document in insertion order.
pub fn list_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare("SELECT id, document FROM products ORDER BY seq")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut products = Vec::new();
    for row in rows {
        let (id, document) = row?;
        let product: Product = serde_json::from_str(&document)
            .with_context(|| format!("Corrupt product document for id {id}"))?;
        products.push(product);
    }
    Ok(products)
}

/// Look up a single product by its id.
pub fn get_product(conn: &Connection, id: &str) -> Result<Option<Product>> {
    let mut stmt = conn.prepare("SELECT document FROM products WHERE id = ?1")?;
    let document: Option<String> = stmt.query_row(params![id], |row| row.get(0)).optional()?;

    match document {
        Some(document) => {
            let product = serde_json::from_str(&document)
                .with_context(|| format!("Corrupt product document for id {id}"))?;
            Ok(Some(product))
        }
        None => Ok(None),
    }
}

/// Insert a new product document. Returns false if the id is already taken.
pub fn insert_product(conn: &Connection, product: &Product) -> Result<bool> {
    let document = serde_json::to_string(product)?;
    let changed = conn.execute(
        "INSERT OR IGNORE INTO products (id, document) VALUES (?1, ?2)",
        params![product.id, document],
    )?;
    Ok(changed == 1)
}

/// Overwrite an existing product document. Returns false if no product has this id.
pub fn replace_product(conn: &Connection, product: &Product) -> Result<bool> {
    let document = serde_json::to_string(product)?;
    let changed = conn.execute(
        "UPDATE products SET document = ?2, updated_at = datetime('now') WHERE id = ?1",
        params![product.id, document],
    )?;
    Ok(changed == 1)
}

/// Merge `patch` into the stored document and write it back in one
/// transaction. Returns `None` if no product has this id.
///
/// A patch that does not produce a valid product fails with a
/// [`DraftError`] (reachable through `anyhow::Error::downcast_ref`) and
/// leaves the stored document untouched.
pub fn update_product(conn: &mut Connection, id: &str, patch: Value) -> Result<Option<Product>> {
    let tx = conn.transaction()?;
    let Some(existing) = get_product(&tx, id)? else {
        return Ok(None);
    };
    let merged = apply_patch(&existing, patch)?;
    replace_product(&tx, &merged)?;
    tx.commit()?;
    Ok(Some(merged))
}

/// Delete a product. Returns false if no product has this id.
pub fn delete_product(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(changed == 1)
}

/// Number of products in the collection.
pub fn product_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    Ok(count)
}

// --- Contact messages ---

/// Store a validated contact-form submission and return its row id.
pub fn insert_contact_message(conn: &Connection, submission: &ContactSubmission) -> Result<i64> {
    conn.execute(
        "INSERT INTO contact_messages
            (first_name, last_name, email, phone, subject, message)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            submission.first_name.trim(),
            submission.last_name.trim(),
            submission.email.trim(),
            submission.phone.trim(),
            submission.subject.trim(),
            submission.message.trim(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent contact messages, newest first.
pub fn get_recent_contact_messages(conn: &Connection, limit: u32) -> Result<Vec<ContactMessage>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email, phone, subject, message, received_at
         FROM contact_messages
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok(ContactMessage {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            subject: row.get(5)?,
            message: row.get(6)?,
            received_at: row.get(7)?,
        })
    })?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(row?);
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn product(id: &str, price: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": price,
        }))
        .unwrap()
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let conn = test_conn();
        for id in ["c", "a", "b"] {
            assert!(insert_product(&conn, &product(id, 10.0)).unwrap());
        }
        let ids: Vec<String> = list_products(&conn)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_insert_duplicate_id_is_rejected() {
        let conn = test_conn();
        assert!(insert_product(&conn, &product("dup", 10.0)).unwrap());
        assert!(!insert_product(&conn, &product("dup", 99.0)).unwrap());
        assert_eq!(get_product(&conn, "dup").unwrap().unwrap().price, 10.0);
        assert_eq!(product_count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_replace_and_delete_missing() {
        let conn = test_conn();
        assert!(!replace_product(&conn, &product("ghost", 1.0)).unwrap());
        assert!(!delete_product(&conn, "ghost").unwrap());
    }

    #[test]
    fn test_replace_keeps_position() {
        let conn = test_conn();
        insert_product(&conn, &product("first", 10.0)).unwrap();
        insert_product(&conn, &product("second", 20.0)).unwrap();
        assert!(replace_product(&conn, &product("first", 15.0)).unwrap());

        let all = list_products(&conn).unwrap();
        assert_eq!(all[0].id, "first");
        assert_eq!(all[0].price, 15.0);
    }

    #[test]
    fn test_update_merges_in_place() {
        let mut conn = test_conn();
        insert_product(&conn, &product("first", 10.0)).unwrap();
        insert_product(&conn, &product("second", 20.0)).unwrap();

        let updated = update_product(&mut conn, "first", serde_json::json!({ "stock": 3 }))
            .unwrap()
            .unwrap();
        assert_eq!(updated.stock, 3);
        assert_eq!(updated.price, 10.0);

        let updated = update_product(&mut conn, "first", serde_json::json!({ "price": 12.5 }))
            .unwrap()
            .unwrap();
        assert_eq!(updated.stock, 3);
        assert_eq!(updated.price, 12.5);

        let all = list_products(&conn).unwrap();
        assert_eq!(all[0].id, "first");
        assert_eq!(all[0].stock, 3);
    }

    #[test]
    fn test_update_missing_or_invalid() {
        let mut conn = test_conn();
        assert!(update_product(&mut conn, "ghost", serde_json::json!({ "price": 1 }))
            .unwrap()
            .is_none());

        insert_product(&conn, &product("p", 10.0)).unwrap();
        let err = update_product(&mut conn, "p", serde_json::json!({ "price": "free" })).unwrap_err();
        assert!(err.downcast_ref::<crate::catalog::draft::DraftError>().is_some());
        assert_eq!(get_product(&conn, "p").unwrap().unwrap().price, 10.0);
    }

    #[test]
    fn test_contact_messages_newest_first() {
        let conn = test_conn();
        let mut submission = ContactSubmission {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+44 20 7946 0000".into(),
            subject: "Sizing".into(),
            message: "Do the hoodies run large?".into(),
        };
        insert_contact_message(&conn, &submission).unwrap();
        submission.subject = "Returns".into();
        insert_contact_message(&conn, &submission).unwrap();

        let messages = get_recent_contact_messages(&conn, 10).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].subject, "Returns");
        assert_eq!(get_recent_contact_messages(&conn, 1).unwrap().len(), 1);
    }
}
