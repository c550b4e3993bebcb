//! # Seed Data Generator
//!
//! Populates the database with customers and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./ventas_dev.db
//! cargo run -p ventas-db --bin seed
//!
//! # Specify database path
//! cargo run -p ventas-db --bin seed -- --db ./data/ventas.db
//! ```

use std::env;

use anyhow::{bail, Context};
use ventas_core::validation::{validate_new_customer, validate_product_input};
use ventas_core::{NewCustomer, ProductInput};
use ventas_db::{Database, DbConfig};

/// (rut, full name, email)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("12345678-9", "Juan Perez", "juan.perez@example.com"),
    ("9876543-2", "Maria Gonzalez", "maria.gonzalez@example.com"),
    ("15432876-K", "Pedro Soto", "pedro.soto@example.com"),
    ("11222333-4", "Camila Rojas", "camila.rojas@example.com"),
    ("20111222-5", "Diego Muñoz", "diego.munoz@example.com"),
];

/// (name, price in cents)
const PRODUCTS: &[(&str, i64)] = &[
    ("Laptop 14\"", 649_990_00),
    ("Mouse inalámbrico", 12_990_00),
    ("Teclado mecánico", 45_990_00),
    ("Monitor 27\"", 189_990_00),
    ("Audífonos bluetooth", 29_990_00),
    ("Cable HDMI 2m", 4_990_00),
    ("Disco SSD 1TB", 59_990_00),
    ("Webcam HD", 24_990_00),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./ventas_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => match args.get(i + 1) {
                Some(path) => {
                    db_path = path.clone();
                    i += 1;
                }
                None => bail!("--db requires a path"),
            },
            "--help" | "-h" => {
                println!("Ventas Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ventas_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    println!("🌱 Ventas Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await? + db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has data ({} rows)", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (rut, full_name, email) in CUSTOMERS {
        let input = NewCustomer {
            rut: rut.to_string(),
            full_name: full_name.to_string(),
            email: Some(email.to_string()),
            address: None,
            phone: None,
        };
        validate_new_customer(&input)?;
        db.customers()
            .insert(&input)
            .await
            .with_context(|| format!("inserting customer {rut}"))?;
    }
    println!("✓ Inserted {} customers", CUSTOMERS.len());

    for (name, price_cents) in PRODUCTS {
        let input = ProductInput {
            name: name.to_string(),
            price_cents: *price_cents,
        };
        validate_product_input(&input)?;
        db.products()
            .insert(&input)
            .await
            .with_context(|| format!("inserting product {name}"))?;
    }
    println!("✓ Inserted {} products", PRODUCTS.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
