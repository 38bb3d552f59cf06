//! # Repository Module
//!
//! Database repository implementations for the Sweet Shop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Route handler                                                         │
//! │       │                                                                 │
//! │       │  db.sweets().purchase(&id, 2)                                  │
//! │       ▼                                                                 │
//! │  SweetRepository                                                       │
//! │  ├── list / search / get_by_id                                         │
//! │  ├── insert / update / delete                                          │
//! │  └── purchase / restock (conditional UPDATE)                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SweetRepository`](sweet::SweetRepository) - Catalog CRUD, search, stock
//! - [`UserRepository`](user::UserRepository) - Accounts and credentials

pub mod sweet;
pub mod user;
