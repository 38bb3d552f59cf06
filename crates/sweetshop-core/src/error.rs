//! # Error Types
//!
//! Domain-specific error types for sweetshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sweetshop-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule and authorization failures       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sweetshop-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What the HTTP client sees (status + JSON)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this module knows about HTTP status codes. The API layer owns
//! that mapping.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No sweet with the given id.
    #[error("Sweet not found: {0}")]
    SweetNotFound(String),

    /// No user with the given id.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Purchase would take the quantity below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// Purchase (qty: 20)
    ///      │
    ///      ▼
    /// Conditional update: quantity >= 20? (available=10)
    ///      │
    ///      ▼
    /// InsufficientStock { available: 10, requested: 20 }
    ///      │
    ///      ▼
    /// 400 { "error": "Insufficient stock" }
    /// ```
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// No principal where one is required.
    #[error("Authentication required")]
    Unauthenticated,

    /// Principal present but its role does not allow the operation.
    #[error("Admin access required")]
    Forbidden,

    /// Registration with an email that already has an account.
    #[error("User with this email already exists")]
    EmailTaken(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Several required fields reported together, e.g. on registration.
    #[error("{0}")]
    MissingFields(String),

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed email, non-numeric price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
