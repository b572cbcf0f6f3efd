//! # Seed Data Generator
//!
//! Populates the database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 30 products (default)
//! cargo run -p inventory-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p inventory-db --bin seed -- --count 200
//!
//! # Specify database path (overrides INVENTORY_DB_PATH)
//! cargo run -p inventory-db --bin seed -- --db ./data/inventory.db
//! ```
//!
//! ## Generated Products
//! Each product comes from one of a few templates (apparel, footwear,
//! drinkware, ...) with its variant matrix. Every combination then receives
//! a pseudo-random stock between 0 and 49 through the service, so the totals
//! are produced by the stock ledger exactly as in production.

use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use inventory_core::{NewProduct, NewVariant, StockUpdate};
use inventory_db::{Database, InventoryConfig, ProductService};

/// Product templates: (code prefix, name, variants)
const TEMPLATES: &[(&str, &str, &[(&str, &[&str])])] = &[
    (
        "TSH",
        "Crew Neck T-Shirt",
        &[
            ("Size", &["XS", "S", "M", "L", "XL"]),
            ("Color", &["Red", "Blue", "Black", "White"]),
        ],
    ),
    (
        "HOD",
        "Zip Hoodie",
        &[
            ("Size", &["S", "M", "L", "XL"]),
            ("Color", &["Grey", "Navy"]),
        ],
    ),
    (
        "SNK",
        "Running Sneaker",
        &[
            ("Size", &["40", "41", "42", "43", "44", "45"]),
            ("Width", &["Regular", "Wide"]),
        ],
    ),
    ("MUG", "Ceramic Mug", &[("Color", &["White", "Black", "Sage"])]),
    (
        "BAG",
        "Canvas Tote",
        &[
            ("Color", &["Natural", "Black"]),
            ("Strap", &["Short", "Long"]),
            ("Print", &["Plain", "Logo"]),
        ],
    ),
];

const DEFAULT_COUNT: usize = 30;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = InventoryConfig::load()?;
    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(DEFAULT_COUNT);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Inventory Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: {DEFAULT_COUNT})");
                println!("  -d, --db <PATH>    Database file path (default: $INVENTORY_DB_PATH or ./inventory_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Inventory Seed Data Generator");
    println!("================================");
    println!("Database: {}", config.database_path.display());
    println!("Products: {}", count);
    println!();

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let service = ProductService::new(db).with_max_combinations(config.max_combinations);

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut adjustments = 0;

    for seed in 0..count {
        let product = generate_product(seed);

        let id = match service.create_product(&product).await {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Failed to create {}: {}", product.code, e);
                continue;
            }
        };
        generated += 1;

        let detail = service.get_product(&id).await?;
        for (idx, combination) in detail.combinations.iter().enumerate() {
            let quantity = ((seed * 31 + idx * 17) % 50) as i64;
            if quantity == 0 {
                continue;
            }

            service
                .add_stock(&StockUpdate {
                    combination_id: combination.id.clone(),
                    quantity,
                })
                .await?;
            adjustments += 1;
        }

        if generated % 10 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} products ({} stock adjustments) in {:?}",
        generated, adjustments, elapsed
    );

    // Verify totals
    println!();
    println!("Verifying stock totals...");
    let page = service.list_products(1, 5).await?;
    for detail in &page {
        println!(
            "  {} {}: {} combinations, total stock {} (sum {})",
            detail.code,
            detail.name,
            detail.combinations.len(),
            detail.total_stock,
            detail.combination_stock_sum()
        );
    }

    println!();
    println!("✓ Seed complete!");

    service.database().close().await;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventory=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds the `seed`-th demo product from the templates.
fn generate_product(seed: usize) -> NewProduct {
    let (prefix, name, variants) = TEMPLATES[seed % TEMPLATES.len()];

    NewProduct {
        code: format!("{}{:04}", prefix, seed),
        name: format!("{} #{}", name, seed / TEMPLATES.len() + 1),
        created_by: "seed".to_string(),
        variants: variants
            .iter()
            .map(|(variant, options)| NewVariant::new(*variant, options.iter().copied()))
            .collect(),
    }
}
