// Colored terminal output for the catalog and contact inbox.
//
// This module handles all terminal-specific formatting: colors and tables.
// The main.rs commands delegate here.

use colored::Colorize;

use crate::catalog::ProductFilter;
use crate::db::models::{ContactMessage, Product, ProductTag};

/// Display a product table, as filtered by the `products` command.
pub fn display_product_list(products: &[Product], filter: &ProductFilter) {
    if products.is_empty() {
        if filter.is_active() {
            println!("No products match these filters.");
        } else {
            println!("No products yet. Run `blackink import <file.json>` first.");
        }
        return;
    }

    println!(
        "\n{}",
        format!("=== Catalog ({} products) ===", products.len()).bold()
    );
    println!();

    println!(
        "  {:<22} {:<34} {:<14} {:>8}  {:>5}  {:<11}",
        "ID".dimmed(),
        "Title".dimmed(),
        "Category".dimmed(),
        "Price".dimmed(),
        "Stock".dimmed(),
        "Tag".dimmed(),
    );
    println!("  {}", "-".repeat(100).dimmed());

    for product in products {
        let stock = if product.in_stock() {
            product.stock.to_string().normal()
        } else {
            "sold".red()
        };
        println!(
            "  {:<22} {:<34} {:<14} {:>8}  {:>5}  {:<11}",
            super::truncate_chars(&product.id, 22),
            super::truncate_chars(&product.title, 32),
            super::truncate_chars(&product.category, 14),
            format_price(product),
            stock,
            colorize_tag(product.tag),
        );
    }
    println!();

    let home = products.iter().filter(|p| p.include_home).count();
    let sold_out = products.iter().filter(|p| !p.in_stock()).count();
    println!("  {} on the home page", home);
    if sold_out > 0 {
        println!("  {} {} sold out", "!".yellow(), sold_out);
    }
}

/// Display recent contact-form messages.
pub fn display_contact_messages(messages: &[ContactMessage]) {
    if messages.is_empty() {
        println!("Contact messages: none yet");
        return;
    }

    println!("Recent contact messages:");
    for msg in messages {
        println!(
            "  [{}] {} {} <{}>: {}",
            msg.received_at.dimmed(),
            msg.first_name,
            msg.last_name,
            msg.email,
            super::truncate_chars(&msg.subject, 60).bold(),
        );
    }
}

/// Price with the pre-sale price when the product is discounted.
fn format_price(product: &Product) -> String {
    match product.original_price {
        Some(original) if original > product.price => {
            format!("{:.2} (was {:.2})", product.price, original)
        }
        _ => format!("{:.2}", product.price),
    }
}

fn colorize_tag(tag: Option<ProductTag>) -> colored::ColoredString {
    match tag {
        Some(ProductTag::BestSeller) => "best-seller".yellow().bold(),
        Some(ProductTag::New) => "new".green(),
        None => "-".dimmed(),
    }
}
