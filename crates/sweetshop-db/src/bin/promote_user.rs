//! # Promote User
//!
//! Grants the admin role to an account, creating it first if needed.
//!
//! ## Usage
//! ```bash
//! cargo run -p sweetshop-db --bin promote-user -- --email=owner@example.com
//! cargo run -p sweetshop-db --bin promote-user -- owner@example.com --db ./sweetshop.db
//! ```
//!
//! A newly created account gets the password `admin123`, printed once so it
//! can be changed.

use std::env;
use std::process::ExitCode;
use sweetshop_core::validation::{validate_email, NAME_MIN_LEN};
use sweetshop_core::{NewUser, Role};
use sweetshop_db::{Database, DbConfig};

const DEFAULT_PASSWORD: &str = "admin123";

fn usage() {
    eprintln!("Usage: promote-user --email=<EMAIL> [--db <PATH>]");
    eprintln!("       promote-user <EMAIL> [--db <PATH>]");
}

/// Display name for an account created here: the email's local part.
fn name_from_email(email: &str) -> String {
    match email.split('@').next() {
        Some(local) if local.chars().count() >= NAME_MIN_LEN => local.to_string(),
        _ => "Promoted User".to_string(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut email: Option<String> = None;
    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./sweetshop.db".to_string());

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if let Some(value) = arg.strip_prefix("--email=") {
            email = Some(value.to_string());
        } else if arg == "--db" || arg == "-d" {
            if let Some(path) = args.get(i + 1) {
                db_path = path.clone();
                i += 1;
            }
        } else if arg == "--help" || arg == "-h" {
            usage();
            return ExitCode::SUCCESS;
        } else if email.is_none() && !arg.starts_with('-') {
            email = Some(arg.to_string());
        }
        i += 1;
    }

    let Some(email) = email.map(|e| e.trim().to_string()) else {
        usage();
        return ExitCode::FAILURE;
    };

    match promote(&db_path, &email).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to promote user: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn promote(db_path: &str, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    validate_email(email)?;

    let db = Database::new(DbConfig::new(db_path)).await?;
    println!("Connected to database: {}", db_path);

    let users = db.users();
    let user = match users.get_by_email(email).await? {
        Some(user) => user,
        None => {
            let created = users
                .insert(&NewUser {
                    email: email.to_string(),
                    password: DEFAULT_PASSWORD.to_string(),
                    name: name_from_email(email),
                    role: Role::User,
                })
                .await?;
            println!(
                "User did not exist and was created with password '{}'",
                DEFAULT_PASSWORD
            );
            created
        }
    };

    if user.role == Role::Admin {
        println!("User is already an admin: {}", user.email);
    } else {
        users.set_role(&user.id, Role::Admin).await?;
        println!("User promoted to admin: {}", user.email);
    }

    db.close().await;
    Ok(())
}
