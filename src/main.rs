//! # catalog-admin
//!
//! Loads the product catalog and prints it as a table.
//!
//! ```bash
//! CATALOG_API_URL=http://localhost:3000 RUST_LOG=info cargo run -- widget
//! ```
//!
//! The optional argument is a search term matched against name and category.

use catalog_sync::config::Config;
use catalog_sync::lifecycle::{setup_tracing, CatalogSystem};
use catalog_sync::model::Product;
use catalog_sync::view::ScreenState;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenv::dotenv().ok();
    setup_tracing();

    let term = std::env::args().nth(1).unwrap_or_default();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let system = CatalogSystem::new(config).map_err(|e| e.to_string())?;

    if let Err(e) = system.product_client.load_products().await {
        error!(error = %e, "Failed to load products");
    }

    match system.product_client.screen(&term).await {
        Ok(ScreenState::Rows(rows)) => {
            info!(term = %term, count = rows.len(), "Showing products");
            print_table(&rows);
        }
        Ok(ScreenState::Error(message)) => println!("Could not load products: {}", message),
        Ok(ScreenState::Loading) => println!("Loading..."),
        Err(e) => error!(error = %e, "Failed to read the catalog"),
    }

    system.shutdown().await?;
    Ok(())
}

fn print_table(rows: &[Product]) {
    println!(
        "{:<12} {:<24} {:<16} {:>10} {:>8} {:>8}",
        "ID", "NAME", "CATEGORY", "PRICE", "STOCK", "SALES"
    );
    for product in rows {
        println!(
            "{:<12} {:<24} {:<16} {:>10.2} {:>8} {:>8}",
            product.id.to_string(),
            product.name,
            product.category,
            product.price,
            product.stock,
            product.sales
        );
    }
    if rows.is_empty() {
        println!("No products found.");
    }
}
