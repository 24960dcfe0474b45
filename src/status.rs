// System status display: DB stats, catalog summary, inbox and admin auth.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use crate::catalog;
use crate::config::Config;
use crate::db::Database;

/// Display system status to the terminal.
pub async fn show(db: &Arc<dyn Database>, config: &Config) -> Result<()> {
    let db_path = &config.db_path;
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let products = db.list_products().await?;
    let categories = catalog::categories(&products);
    let in_stock = products.iter().filter(|p| p.in_stock()).count();
    println!(
        "Products: {} total, {} in stock, {} categories",
        products.len(),
        in_stock,
        categories.len().saturating_sub(1)
    );
    println!(
        "Home page: {} products",
        catalog::home_products(&products).len()
    );

    let messages = db.get_recent_contact_messages(5).await?;
    crate::output::terminal::display_contact_messages(&messages);

    let admin = if config.auth.is_configured() {
        "configured".green()
    } else {
        "not configured (set ADMIN_PASSWORD)".red()
    };
    println!("Admin login: {}", admin);

    if !Path::new(&config.uploads_dir).exists() {
        println!("Uploads: {} (not created yet)", config.uploads_dir.display());
    } else {
        println!("Uploads: {}", config.uploads_dir.display());
    }

    Ok(())
}

/// Format a byte count into a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
