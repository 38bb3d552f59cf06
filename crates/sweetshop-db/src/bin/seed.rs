//! # Seed Data Generator
//!
//! Resets the database to a known demo state.
//!
//! ## Usage
//! ```bash
//! # Seed ./sweetshop.db (or $DATABASE_PATH)
//! cargo run -p sweetshop-db --bin seed
//!
//! # Specify database path
//! cargo run -p sweetshop-db --bin seed -- --db ./data/sweetshop.db
//! ```
//!
//! ## What Gets Created
//! - `admin@sweetshop.com` / `admin123` (role admin)
//! - `user@sweetshop.com` / `user123` (role user)
//! - Eight sweets across Chocolate, Gummies, Caramels, Lollipops, Hard Candy
//!
//! Existing sweets and users are deleted first.

use std::env;
use sweetshop_core::{Money, NewSweet, NewUser, Role};
use sweetshop_db::{Database, DbConfig};

/// (name, category, price in cents, quantity, description)
const SWEETS: &[(&str, &str, i64, i64, &str)] = &[
    (
        "Chocolate Truffle",
        "Chocolate",
        299,
        50,
        "Rich dark chocolate truffle with a smooth ganache center",
    ),
    (
        "Gummy Bears",
        "Gummies",
        199,
        100,
        "Colorful fruit-flavored gummy bears",
    ),
    (
        "Caramel Candy",
        "Caramels",
        149,
        75,
        "Soft and chewy caramel candies",
    ),
    (
        "Lollipop",
        "Lollipops",
        99,
        200,
        "Classic swirl lollipop in assorted flavors",
    ),
    (
        "Hard Candy",
        "Hard Candy",
        79,
        150,
        "Assorted fruit hard candies",
    ),
    (
        "Chocolate Bar",
        "Chocolate",
        349,
        30,
        "Creamy milk chocolate bar",
    ),
    (
        "Sour Gummy Worms",
        "Gummies",
        249,
        60,
        "Tangy sour gummy worms",
    ),
    (
        "Toffee Candy",
        "Caramels",
        299,
        40,
        "Buttery English toffee pieces",
    ),
];

/// (email, password, name, role)
const USERS: &[(&str, &str, &str, Role)] = &[
    ("admin@sweetshop.com", "admin123", "Admin User", Role::Admin),
    ("user@sweetshop.com", "user123", "Regular User", Role::User),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./sweetshop.db".to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sweet Shop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $DATABASE_PATH or ./sweetshop.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Sweet Shop Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let removed_sweets = db.sweets().delete_all().await?;
    let removed_users = db.users().delete_all().await?;
    println!(
        "✓ Cleared {} sweets and {} users",
        removed_sweets, removed_users
    );

    println!();
    println!("Creating users...");
    for (email, password, name, role) in USERS {
        let new_user = NewUser {
            role: *role,
            ..NewUser::registration(email, password, name)?
        };
        let user = db.users().insert(&new_user).await?;
        println!("  {} ({}) / {}", user.email, user.role, password);
    }

    println!();
    println!("Creating sweets...");
    for (name, category, cents, quantity, description) in SWEETS {
        let new_sweet = NewSweet {
            name: name.to_string(),
            category: category.to_string(),
            price: Money::from_cents(*cents),
            quantity: *quantity,
            description: Some(description.to_string()),
        }
        .validated()?;

        let sweet = db.sweets().insert(&new_sweet).await?;
        println!(
            "  {:<20} {:<12} {}  qty {}",
            sweet.name,
            sweet.category,
            sweet.price(),
            sweet.quantity
        );
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
