//! # sweetshop-db: Database Layer for the Sweet Shop
//!
//! This crate provides persistence for the Sweet Shop API.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sweet Shop Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/sweets/:id/purchase)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   sweetshop-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ SweetRepo     │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ UserRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  │                     ./sweetshop.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`password`] - Argon2 password hashing
//! - [`repository`] - Repository implementations (sweets, users)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sweetshop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./sweetshop.db")).await?;
//!
//! let sweets = db.sweets().list().await?;
//! let (sweet, change) = db.sweets().purchase(&sweets[0].id, 1).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::sweet::SweetRepository;
pub use repository::user::UserRepository;
