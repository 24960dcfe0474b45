use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use blackink::catalog::{PriceRange, ProductFilter, SortOrder, TagFilter};
use blackink::config::Config;
use blackink::db::models::Product;

/// BlackInkkk: storefront API and admin panel for the clothing line.
#[derive(Parser)]
#[command(name = "blackink", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Run the web server (storefront API, admin panel, static files)
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Import products from a JSON array of product documents
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// List the catalog, with the same filters the storefront offers
    Products {
        /// Exact category name
        #[arg(long)]
        category: Option<String>,

        /// all | new | best-seller
        #[arg(long)]
        tag: Option<TagFilter>,

        /// all | under-75 | 75-125 | over-125
        #[arg(long)]
        price: Option<PriceRange>,

        /// Hide sold-out products
        #[arg(long)]
        in_stock: bool,

        /// default | price-asc | price-desc
        #[arg(long)]
        sort: Option<SortOrder>,
    },

    /// Show system status (DB stats, catalog summary, recent messages)
    Status,

    /// Print a short fingerprint of the current admin session token
    #[cfg(feature = "web")]
    Token,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blackink=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            let db = blackink::db::initialize_sqlite(&config.db_path)?;
            let tables = db.table_count().await?;
            println!(
                "{} Database ready at {} ({} tables)",
                "✓".green(),
                config.db_path,
                tables
            );
            if !config.auth.is_configured() {
                println!(
                    "{} ADMIN_PASSWORD is not set. The admin panel stays locked until it is.",
                    "!".yellow()
                );
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let db = blackink::db::initialize_sqlite(&config.db_path)?;
            info!(db = %config.db_path, public = %config.public_dir.display(), "Starting server");
            blackink::web::run_server(config, db, port, &bind).await?;
        }

        Commands::Import { file } => {
            let config = Config::load()?;
            let db = blackink::db::initialize_sqlite(&config.db_path)?;

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let products: Vec<Product> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of products", file.display()))?;

            let mut inserted = 0usize;
            let mut skipped = 0usize;
            for product in &products {
                if db.insert_product(product).await? {
                    inserted += 1;
                } else {
                    skipped += 1;
                }
            }
            info!(inserted, skipped, "Import finished");
            println!(
                "{} Imported {} products ({} already present, skipped)",
                "✓".green(),
                inserted,
                skipped
            );
        }

        Commands::Products {
            category,
            tag,
            price,
            in_stock,
            sort,
        } => {
            let config = Config::load()?;
            let db = blackink::db::open_sqlite(&config.db_path)?;
            let filter = ProductFilter {
                category,
                tag: tag.unwrap_or_default(),
                price: price.unwrap_or_default(),
                in_stock_only: in_stock,
                sort: sort.unwrap_or_default(),
            };
            let products = db.list_products().await?;
            let filtered = filter.apply(&products);
            blackink::output::terminal::display_product_list(&filtered, &filter);
        }

        Commands::Status => {
            let config = Config::load()?;
            let db = blackink::db::open_sqlite(&config.db_path)?;
            blackink::status::show(&db, &config).await?;
        }

        #[cfg(feature = "web")]
        Commands::Token => {
            let config = Config::load()?;
            let Some(password) = config.auth.admin_password.as_deref() else {
                anyhow::bail!("ADMIN_PASSWORD not set. Add it to your .env file.");
            };
            let token = blackink::web::auth::derive_token(&config.auth.session_secret, password)?;
            // Only a prefix: the full token is a working admin credential.
            println!("admin_token fingerprint: {}…", &token[..8]);
        }
    }

    Ok(())
}
