//! # sweetshop-core: Pure Business Logic for the Sweet Shop
//!
//! This crate holds the inventory rules as pure functions with zero I/O
//! dependencies. The database and HTTP layers call into it; it never calls
//! out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sweet Shop Request Flow                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │   bearer token ──► Principal ──► route handler                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ sweetshop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   auth    │  │   stock   │  │  filter   │  │ validation│  │   │
//! │  │   │ Principal │  │ Purchase  │  │ SweetFilt │  │   rules   │  │   │
//! │  │   │ authorize │  │ Restock   │  │  matches  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 sweetshop-db (Database Layer)                   │   │
//! │  │        SQLite queries, conditional stock updates, users         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sweet, User, Role)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`auth`] - Principal and the authorization gate
//! - [`stock`] - Purchase/restock under the non-negativity invariant
//! - [`filter`] - Catalog search predicates
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use sweetshop_core::stock::StockOperation;
//!
//! let change = StockOperation::Purchase(2).apply(10).unwrap();
//! assert_eq!(change.new_quantity, 8);
//!
//! assert!(StockOperation::Purchase(20).apply(10).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod filter;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{authorize, OperationKind, Principal};
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::SweetFilter;
pub use money::Money;
pub use stock::{StockChange, StockOperation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity used by a purchase request that omits `quantity`.
pub const DEFAULT_PURCHASE_QUANTITY: i64 = 1;

/// Quantity used by a restock request that omits `quantity`.
///
/// Matches the admin form's default of topping up ten units at a time.
pub const DEFAULT_RESTOCK_QUANTITY: i64 = 10;
